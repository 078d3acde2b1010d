//! Collaborators the authenticator is wired with.
//!
//! A deployment supplies a [`CredentialVerifier`] and a [`UserDetailsService`]; the
//! access control source and store come from [`crate::source`] and [`crate::store`].
//! Diagnostics for undefined access controls go to an [`AuthenticationListener`].

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::CredentialError;
use crate::primitives::{
    AccessControlId, AuthenticatedUser, Credentials, GrantedAuthority, LoginRequest, Principal,
    SimplePrincipal,
};

/// Checks a login against whatever credential store the deployment uses
/// (password hashes, a container login, an identity provider).
///
/// Errors are reported as they are; the authenticator never retries.
pub trait CredentialVerifier: Send + Sync {
    fn verify_credentials(&self, username: &str, credentials: &Credentials) -> Result<(), CredentialError>;
}

/// Deployment specific user lookup and user record construction.
pub trait UserDetailsService: Send + Sync {
    /// Internal identity handed to the access control source.
    type Principal: Principal;
    /// Record returned to the caller after a successful login.
    type User;

    /// Looks up the internal identity for `username`. Only called once the
    /// credentials in `login` have been verified.
    fn retrieve_principal(&self, username: &str, login: &LoginRequest) -> Option<Self::Principal>;

    /// Builds the user record. `authorities` holds one entry per granted access control.
    fn create_user(
        &self,
        username: &str,
        credentials: Credentials,
        principal: Self::Principal,
        authorities: HashSet<GrantedAuthority>,
    ) -> Self::User;
}

/// Receives access control ids that could not be resolved during a login.
///
/// Called once per id per authentication attempt. The login outcome does not depend
/// on what the listener does.
pub trait AuthenticationListener: Send + Sync {
    fn unresolved_access_control(&self, username: &str, id: &AccessControlId);
}

/// Default listener: a `warn` event per undefined access control.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingListener;

impl AuthenticationListener for TracingListener {
    fn unresolved_access_control(&self, username: &str, id: &AccessControlId) {
        tracing::warn!(username, id = %id, "Undefined access control");
    }
}

/// Username to principal table producing [`AuthenticatedUser`] records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDetailsService {
    principals: HashMap<String, SimplePrincipal>,
}

impl InMemoryUserDetailsService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a login whose principal carries the same name.
    pub fn with_user(mut self, username: impl Into<String>) -> Self {
        let username = username.into();
        let principal = SimplePrincipal::new(username.clone());
        self.principals.insert(username, principal);
        self
    }

    /// Registers a login mapped to a differently named principal.
    pub fn with_principal(mut self, username: impl Into<String>, principal: SimplePrincipal) -> Self {
        self.principals.insert(username.into(), principal);
        self
    }
}

impl UserDetailsService for InMemoryUserDetailsService {
    type Principal = SimplePrincipal;
    type User = AuthenticatedUser<SimplePrincipal>;

    fn retrieve_principal(&self, username: &str, _login: &LoginRequest) -> Option<SimplePrincipal> {
        self.principals.get(username).cloned()
    }

    fn create_user(
        &self,
        username: &str,
        credentials: Credentials,
        principal: SimplePrincipal,
        authorities: HashSet<GrantedAuthority>,
    ) -> AuthenticatedUser<SimplePrincipal> {
        AuthenticatedUser::new(username, credentials, principal, authorities)
    }
}

// Shared collaborators.

impl<T: CredentialVerifier + ?Sized> CredentialVerifier for Arc<T> {
    fn verify_credentials(&self, username: &str, credentials: &Credentials) -> Result<(), CredentialError> {
        (**self).verify_credentials(username, credentials)
    }
}

impl<T: AuthenticationListener + ?Sized> AuthenticationListener for Arc<T> {
    fn unresolved_access_control(&self, username: &str, id: &AccessControlId) {
        (**self).unresolved_access_control(username, id)
    }
}
