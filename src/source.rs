//! Principal to access control id sources.

use std::collections::HashMap;
use std::sync::Arc;

use crate::primitives::{AccessControlId, Principal};

/// Yields the access control ids directly assigned to a principal (typically its roles).
///
/// Implementations must not mutate the principal. An empty result is valid and simply
/// means the principal has been granted nothing.
pub trait PrincipalAccessControlSource<P>: Send + Sync {
    fn access_control_ids(&self, principal: &P) -> Vec<AccessControlId>;
}

impl<P, T: PrincipalAccessControlSource<P> + ?Sized> PrincipalAccessControlSource<P> for Arc<T> {
    fn access_control_ids(&self, principal: &P) -> Vec<AccessControlId> {
        (**self).access_control_ids(principal)
    }
}

/// Fixed assignment table keyed by principal name.
#[derive(Debug, Clone, Default)]
pub struct StaticAccessControlSource {
    assignments: HashMap<String, Vec<AccessControlId>>,
}

impl StaticAccessControlSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns `ids` to the principal named `name`, replacing any earlier assignment.
    pub fn assign<I, C>(mut self, name: impl Into<String>, ids: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<AccessControlId>,
    {
        self.assignments
            .insert(name.into(), ids.into_iter().map(Into::into).collect());
        self
    }
}

impl<P: Principal> PrincipalAccessControlSource<P> for StaticAccessControlSource {
    fn access_control_ids(&self, principal: &P) -> Vec<AccessControlId> {
        self.assignments
            .get(principal.name())
            .cloned()
            .unwrap_or_default()
    }
}
