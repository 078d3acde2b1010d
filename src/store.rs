//!
//! Access control graph stores.
//!
//! A store answers one question: which definition belongs to an id. It holds no
//! business logic. [`InMemoryAccessControlStore`] is immutable once built and can be
//! read from any number of threads without locking. [`ReloadableAccessControlStore`]
//! swaps whole snapshots behind a read/write lock for deployments that reload the
//! schema at runtime.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::primitives::{AccessControl, AccessControlId};

/// Lookup of access control definitions by id.
pub trait AccessControlStore: Send + Sync {
    /// Returns the definition for `id`, or `None` if it is not declared.
    fn lookup(&self, id: &AccessControlId) -> Option<AccessControl>;

    fn contains(&self, id: &AccessControlId) -> bool {
        self.lookup(id).is_some()
    }

    /// A fixed generation of this store to read a whole expansion from, for stores
    /// whose contents can change between lookups. Immutable stores return `None`
    /// and are read directly.
    fn pinned(&self) -> Option<Arc<dyn AccessControlStore>> {
        None
    }
}

impl<S: AccessControlStore + ?Sized> AccessControlStore for Arc<S> {
    fn lookup(&self, id: &AccessControlId) -> Option<AccessControl> {
        (**self).lookup(id)
    }

    fn contains(&self, id: &AccessControlId) -> bool {
        (**self).contains(id)
    }

    fn pinned(&self) -> Option<Arc<dyn AccessControlStore>> {
        (**self).pinned()
    }
}

impl<S: AccessControlStore + ?Sized> AccessControlStore for &S {
    fn lookup(&self, id: &AccessControlId) -> Option<AccessControl> {
        (**self).lookup(id)
    }

    fn contains(&self, id: &AccessControlId) -> bool {
        (**self).contains(id)
    }

    fn pinned(&self) -> Option<Arc<dyn AccessControlStore>> {
        (**self).pinned()
    }
}

/// Immutable map of access control definitions.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAccessControlStore {
    entries: HashMap<AccessControlId, AccessControl>,
}

impl InMemoryAccessControlStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a definition, replacing any earlier one with the same id.
    pub fn insert(&mut self, access_control: AccessControl) -> Option<AccessControl> {
        self.entries.insert(access_control.id.clone(), access_control)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &AccessControlId> {
        self.entries.keys()
    }

    pub fn get(&self, id: &AccessControlId) -> Option<&AccessControl> {
        self.entries.get(id)
    }
}

impl AccessControlStore for InMemoryAccessControlStore {
    fn lookup(&self, id: &AccessControlId) -> Option<AccessControl> {
        self.entries.get(id).cloned()
    }

    fn contains(&self, id: &AccessControlId) -> bool {
        self.entries.contains_key(id)
    }
}

impl FromIterator<AccessControl> for InMemoryAccessControlStore {
    fn from_iter<T: IntoIterator<Item = AccessControl>>(iter: T) -> Self {
        let mut store = InMemoryAccessControlStore::new();
        for access_control in iter {
            store.insert(access_control);
        }
        store
    }
}

/// Store whose contents can be replaced wholesale while authentications are in flight.
///
/// Each `replace` installs a whole new snapshot, so a single lookup never sees a
/// half-applied reload. Separate lookups may straddle a reload; callers that need one
/// generation for a whole traversal go through [`pinned`](AccessControlStore::pinned)
/// or [`snapshot`](Self::snapshot), as the authenticator does.
#[derive(Debug, Default)]
pub struct ReloadableAccessControlStore {
    current: RwLock<Arc<InMemoryAccessControlStore>>,
}

impl ReloadableAccessControlStore {
    pub fn new(initial: InMemoryAccessControlStore) -> Self {
        ReloadableAccessControlStore {
            current: RwLock::new(Arc::new(initial)),
        }
    }

    /// Installs `next` and returns the snapshot it replaced.
    pub fn replace(&self, next: InMemoryAccessControlStore) -> Arc<InMemoryAccessControlStore> {
        let next = Arc::new(next);
        let mut guard = self.current.write();
        tracing::debug!(
            previous = guard.len(),
            current = next.len(),
            "Access control store reloaded"
        );
        std::mem::replace(&mut *guard, next)
    }

    pub fn snapshot(&self) -> Arc<InMemoryAccessControlStore> {
        self.current.read().clone()
    }
}

impl AccessControlStore for ReloadableAccessControlStore {
    fn lookup(&self, id: &AccessControlId) -> Option<AccessControl> {
        self.current.read().lookup(id)
    }

    fn contains(&self, id: &AccessControlId) -> bool {
        self.current.read().contains(id)
    }

    fn pinned(&self) -> Option<Arc<dyn AccessControlStore>> {
        Some(self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> InMemoryAccessControlStore {
        [
            AccessControl::group("Chief", ["Cook", "Barkeeper"]),
            AccessControl::permission("Cook"),
            AccessControl::permission("Barkeeper"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn lookup_found_and_missing() {
        let store = sample();
        assert_eq!(store.len(), 3);
        let chief = store.lookup(&"Chief".into()).unwrap();
        assert_eq!(chief.children, vec![AccessControlId::from("Cook"), AccessControlId::from("Barkeeper")]);
        assert!(store.lookup(&"Waiter".into()).is_none());
        assert!(!store.contains(&"Waiter".into()));
    }

    #[test]
    fn insert_replaces_by_id() {
        let mut store = sample();
        let previous = store.insert(AccessControl::group("Cook", ["Knife"]));
        assert!(previous.unwrap().is_leaf());
        assert_eq!(store.len(), 3);
        assert_eq!(store.get(&"Cook".into()).unwrap().children.len(), 1);
    }

    #[test]
    fn reload_swaps_snapshot() {
        let reloadable = ReloadableAccessControlStore::new(sample());
        let pinned = reloadable.snapshot();

        let previous = reloadable.replace([AccessControl::permission("Waiter")].into_iter().collect());
        assert_eq!(previous.len(), 3);

        assert!(reloadable.contains(&"Waiter".into()));
        assert!(!reloadable.contains(&"Chief".into()));
        // The pinned generation is untouched.
        assert!(pinned.contains(&"Chief".into()));
    }

    #[test]
    fn only_reloadable_store_pins() {
        assert!(sample().pinned().is_none());

        let reloadable = Arc::new(ReloadableAccessControlStore::new(sample()));
        let pinned = reloadable.pinned().unwrap();
        reloadable.replace(InMemoryAccessControlStore::new());
        assert!(pinned.contains(&"Chief".into()));
        assert!(!reloadable.contains(&"Chief".into()));
    }

    #[test]
    fn shared_store_is_usable_through_arc() {
        let shared: Arc<dyn AccessControlStore> = Arc::new(sample());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&shared);
                std::thread::spawn(move || store.contains(&"Chief".into()))
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
