//!
//! Access control expansion.
//! Computes the transitive closure of a set of root ids over an access control graph,
//! tolerating ids that are not declared and graphs that contain cycles.

use std::collections::{HashSet, VecDeque};

use crate::primitives::{AccessControl, AccessControlId};
use crate::store::AccessControlStore;

/// Result of one expansion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
    /// Every access control reachable from the roots, each exactly once.
    pub resolved: HashSet<AccessControl>,
    /// Ids with no definition in the store, in the order they were first met.
    pub unresolved: Vec<AccessControlId>,
}

impl Expansion {
    /// Ids of the resolved access controls.
    pub fn resolved_ids(&self) -> HashSet<AccessControlId> {
        self.resolved.iter().map(|ac| ac.id.clone()).collect()
    }

    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Expands `roots` into the full set of access controls they grant.
///
/// Breadth-first traversal with a visited set: each id is looked up at most once no
/// matter how many parents reference it, so diamonds collapse and cycles terminate.
/// An id missing from the store is recorded in [`Expansion::unresolved`] and its
/// (unknown) children are not followed; expansion of the other ids carries on.
///
/// # Arguments
/// * `store` - The graph to traverse.
/// * `roots` - Ids directly assigned to a principal. Duplicates are harmless.
///
/// # Returns
/// The resolved set and the unresolved ids. An empty `roots` yields an empty `Expansion`.
pub fn expand<S, I>(store: &S, roots: I) -> Expansion
where
    S: AccessControlStore + ?Sized,
    I: IntoIterator<Item = AccessControlId>,
{
    let mut worklist: VecDeque<AccessControlId> = roots.into_iter().collect();
    let mut visited: HashSet<AccessControlId> = HashSet::with_capacity(worklist.len());
    let mut expansion = Expansion::default();

    while let Some(id) = worklist.pop_front() {
        if visited.contains(&id) {
            continue;
        }
        match store.lookup(&id) {
            Some(access_control) => {
                worklist.extend(
                    access_control
                        .children
                        .iter()
                        .filter(|child| !visited.contains(*child))
                        .cloned(),
                );
                expansion.resolved.insert(access_control);
            }
            None => {
                tracing::debug!(id = %id, "Access control is not defined");
                expansion.unresolved.push(id.clone());
            }
        }
        visited.insert(id);
    }

    expansion
}
