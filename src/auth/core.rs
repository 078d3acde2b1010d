//!
//! Access control based authentication.
//!
//! The [`Authenticator`] verifies a login, resolves the principal behind it and
//! expands the principal's directly assigned access controls into the full set of
//! granted authorities before handing everything to the user service.

use std::collections::HashSet;

use uuid::Uuid;

use crate::auth::service::{AuthenticationListener, CredentialVerifier, TracingListener, UserDetailsService};
use crate::error::AuthenticationError;
use crate::expand::expand;
use crate::primitives::{AccessControlId, Credentials, GrantedAuthority, LoginRequest, Principal};
use crate::source::PrincipalAccessControlSource;
use crate::store::AccessControlStore;

/// Authorities resolved for a principal, plus the assigned ids that had no definition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub authorities: HashSet<GrantedAuthority>,
    pub unresolved: Vec<AccessControlId>,
}

/// Authentication orchestrator.
///
/// All collaborators are fixed at construction; the value is never mutated afterwards
/// and may be shared across threads (wrap it in an `Arc`) to serve concurrent logins.
#[derive(Debug)]
pub struct Authenticator<V, D, S, A, L = TracingListener> {
    verifier: V,
    users: D,
    source: S,
    store: A,
    listener: L,
}

impl<V, D, S, A> Authenticator<V, D, S, A, TracingListener>
where
    V: CredentialVerifier,
    D: UserDetailsService,
    S: PrincipalAccessControlSource<D::Principal>,
    A: AccessControlStore,
{
    /// Creates an authenticator reporting undefined access controls through `tracing`.
    pub fn new(verifier: V, users: D, source: S, store: A) -> Self {
        Authenticator {
            verifier,
            users,
            source,
            store,
            listener: TracingListener,
        }
    }
}

impl<V, D, S, A, L> Authenticator<V, D, S, A, L>
where
    V: CredentialVerifier,
    D: UserDetailsService,
    S: PrincipalAccessControlSource<D::Principal>,
    A: AccessControlStore,
    L: AuthenticationListener,
{
    /// Replaces the diagnostics listener.
    pub fn with_listener<L2: AuthenticationListener>(self, listener: L2) -> Authenticator<V, D, S, A, L2> {
        Authenticator {
            verifier: self.verifier,
            users: self.users,
            source: self.source,
            store: self.store,
            listener,
        }
    }

    pub fn store(&self) -> &A {
        &self.store
    }

    /// authenticate(username, credentials) → user
    ///
    /// Fails only if the credentials are rejected or no principal exists for the
    /// username. Undefined access controls are passed to the listener and otherwise
    /// ignored: the user gets whatever did resolve.
    pub fn authenticate(&self, username: &str, credentials: Credentials) -> Result<D::User, AuthenticationError> {
        let attempt = Uuid::new_v4();
        let span = tracing::info_span!("authenticate", %attempt, username);
        let _entered = span.enter();

        // 1. Nothing else runs for an unverified identity.
        if let Err(err) = self.verifier.verify_credentials(username, &credentials) {
            tracing::warn!(reason = %err, "Authentication failed");
            return Err(err.into());
        }

        // 2. Internal identity.
        let login = LoginRequest::new(username, credentials);
        let principal = match self.users.retrieve_principal(username, &login) {
            Some(principal) => principal,
            None => {
                tracing::warn!("Failed to retrieve user for login");
                return Err(AuthenticationError::PrincipalNotFound(username.to_string()));
            }
        };

        // 3.-4. Assigned ids and their closure.
        let resolution = self.resolve_authorities(&principal);

        // 5. Diagnostics only; never changes the outcome.
        for id in &resolution.unresolved {
            self.listener.unresolved_access_control(username, id);
        }

        tracing::debug!(
            principal = principal.name(),
            authorities = resolution.authorities.len(),
            unresolved = resolution.unresolved.len(),
            "Authentication succeeded"
        );

        // 6.-7. Materialise the user.
        Ok(self
            .users
            .create_user(username, login.credentials, principal, resolution.authorities))
    }

    /// Resolves the authorities of an already known principal without touching
    /// credentials, e.g. to refresh an existing session after the schema changed.
    pub fn resolve_authorities(&self, principal: &D::Principal) -> Resolution {
        let roots = self.source.access_control_ids(principal);
        // One store generation per resolution, even if the store reloads meanwhile.
        let expansion = match self.store.pinned() {
            Some(snapshot) => expand(&*snapshot, roots),
            None => expand(&self.store, roots),
        };
        Resolution {
            authorities: expansion.resolved.into_iter().map(GrantedAuthority::new).collect(),
            unresolved: expansion.unresolved,
        }
    }
}
