#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(deprecated)]

//!
//! Authority-Core authenticates a principal and resolves it into the flattened set of
//! access controls it has been granted.
//!
//! Access controls form a graph: a group may inherit other groups and bundle leaf
//! permissions. Given the few ids directly assigned to a principal, the crate computes
//! the transitive closure of that graph, reporting undefined ids and tolerating
//! cyclic definitions, and hands the result to the authorization layer as a set of
//! granted authorities.
//!
//! ```
//! use authority_core::{
//!     expand, AccessControl, AccessControlId, InMemoryAccessControlStore,
//! };
//!
//! let store: InMemoryAccessControlStore = [
//!     AccessControl::group("Chief", ["Cook"]),
//!     AccessControl::permission("Cook"),
//! ]
//! .into_iter()
//! .collect();
//!
//! let expansion = expand(&store, vec![AccessControlId::from("Chief"), AccessControlId::from("Ghost")]);
//! assert_eq!(expansion.resolved.len(), 2);
//! assert_eq!(expansion.unresolved, vec![AccessControlId::from("Ghost")]);
//! ```

// Identifiers, access controls, authorities, principals and credentials.
pub mod primitives;

pub use primitives::*;

// Error types.
pub mod error;

// Graph stores.
pub mod store;

// Transitive closure over the graph.
pub mod expand;

// Principal to access control id sources.
pub mod source;

// Loading stores from a schema document.
pub mod schema;

// Authentication orchestration.
pub mod auth;

#[cfg(feature = "subscriber")]
pub mod logging;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use auth::{
    AuthenticationListener, Authenticator, CredentialVerifier, InMemoryUserDetailsService, Resolution,
    TracingListener, UserDetailsService,
};
pub use error::{AuthenticationError, CredentialError, SchemaError};
pub use expand::{expand, Expansion};
pub use schema::AccessControlSchema;
pub use source::{PrincipalAccessControlSource, StaticAccessControlSource};
pub use store::{AccessControlStore, InMemoryAccessControlStore, ReloadableAccessControlStore};
