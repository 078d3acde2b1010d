//! Stub collaborators with call counters, for tests of code built on this crate.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::auth::service::{AuthenticationListener, CredentialVerifier};
use crate::error::CredentialError;
use crate::primitives::{AccessControl, AccessControlId, Credentials};
use crate::source::PrincipalAccessControlSource;
use crate::store::AccessControlStore;

/// Plain-text username/password table. Test use only.
#[derive(Debug, Default)]
pub struct StaticCredentialVerifier {
    passwords: HashMap<String, String>,
    calls: AtomicUsize,
}

impl StaticCredentialVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_password(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.passwords.insert(username.into(), password.into());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CredentialVerifier for StaticCredentialVerifier {
    fn verify_credentials(&self, username: &str, credentials: &Credentials) -> Result<(), CredentialError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match (self.passwords.get(username), credentials.expose_secret()) {
            (Some(expected), Some(given)) if expected == given => Ok(()),
            (Some(_), _) => Err(CredentialError::new("bad credentials")),
            (None, _) => Err(CredentialError::new("unknown login")),
        }
    }
}

/// Wraps a store and counts lookups.
#[derive(Debug, Default)]
pub struct CountingStore<S> {
    inner: S,
    lookups: AtomicUsize,
}

impl<S> CountingStore<S> {
    pub fn new(inner: S) -> Self {
        CountingStore {
            inner,
            lookups: AtomicUsize::new(0),
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl<S: AccessControlStore> AccessControlStore for CountingStore<S> {
    fn lookup(&self, id: &AccessControlId) -> Option<AccessControl> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.lookup(id)
    }
}

/// Wraps a source and counts calls.
#[derive(Debug, Default)]
pub struct CountingSource<S> {
    inner: S,
    calls: AtomicUsize,
}

impl<S> CountingSource<S> {
    pub fn new(inner: S) -> Self {
        CountingSource {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<P, S: PrincipalAccessControlSource<P>> PrincipalAccessControlSource<P> for CountingSource<S> {
    fn access_control_ids(&self, principal: &P) -> Vec<AccessControlId> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.access_control_ids(principal)
    }
}

/// Records every unresolved access control reported to it.
#[derive(Debug, Default)]
pub struct RecordingListener {
    events: Mutex<Vec<(String, AccessControlId)>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(String, AccessControlId)> {
        self.events.lock().clone()
    }
}

impl AuthenticationListener for RecordingListener {
    fn unresolved_access_control(&self, username: &str, id: &AccessControlId) {
        self.events.lock().push((username.to_string(), id.clone()));
    }
}
