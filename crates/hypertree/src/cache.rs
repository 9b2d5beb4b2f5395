use std::collections::{HashMap, HashSet};
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;

use crate::graph::{EdgeSet, Graph};

#[derive(Default)]
struct CacheEntry {
    fail: HashSet<u64>,
    succ: HashSet<u64>,
}

type Storage = RwLock<HashMap<u64, CacheEntry>>;

/// A thread-safe memo of subproblems that are known to fail.
///
/// Entries are keyed by the content hash of a separator and hold the content hashes of
/// the components that failed (or succeeded) below it. The storage is created on first
/// use. Clones and aliases share the same storage.
///
/// ```rust
/// use hypertree::{Cache, Graph};
///
/// let graph = Graph::from_edges([(1, vec![1, 2]), (2, vec![2, 3]), (3, vec![3, 4])]);
/// let separator = graph.edges().subset(&[1]);
/// let components = graph.components(&separator).into_graphs();
///
/// let cache = Cache::default();
/// assert!(!cache.check_negative(&separator, &components));
/// cache.add_negative(&separator, &components[0]);
/// assert!(cache.check_negative(&separator, &components));
/// ```
#[derive(Clone, Default)]
pub struct Cache {
    storage: Arc<OnceLock<Storage>>,
}

impl Cache {
    /// Create the storage if it does not exist yet.
    pub fn init(&self) {
        self.storage();
    }

    fn storage(&self) -> &Storage {
        self.storage.get_or_init(Storage::default)
    }

    /// Share the storage of `other`.
    pub fn alias(&mut self, other: &Cache) {
        self.storage = Arc::clone(&other.storage);
    }

    /// Record that `component` has no decomposition below `separator`.
    pub fn add_negative(&self, separator: &EdgeSet, component: &Graph) {
        let mut storage = self.storage().write();
        storage.entry(separator.content_hash()).or_default().fail.insert(component.content_hash());
    }

    /// Record that `component` has a decomposition below `separator`.
    pub fn add_positive(&self, separator: &EdgeSet, component: &Graph) {
        let mut storage = self.storage().write();
        storage.entry(separator.content_hash()).or_default().succ.insert(component.content_hash());
    }

    /// Returns whether any of the `components` is known to fail below `separator`.
    pub fn check_negative(&self, separator: &EdgeSet, components: &[Graph]) -> bool {
        let Some(storage) = self.storage.get() else {
            return false;
        };
        let storage = storage.read();
        storage
            .get(&separator.content_hash())
            .is_some_and(|entry| components.iter().any(|c| entry.fail.contains(&c.content_hash())))
    }

    /// Returns whether `component` is known to succeed below `separator`.
    pub fn check_positive(&self, separator: &EdgeSet, component: &Graph) -> bool {
        let Some(storage) = self.storage.get() else {
            return false;
        };
        let storage = storage.read();
        storage.get(&separator.content_hash()).is_some_and(|entry| entry.succ.contains(&component.content_hash()))
    }

    /// Return the number of separators with an entry.
    pub fn len(&self) -> usize {
        self.storage.get().map_or(0, |storage| storage.read().len())
    }

    /// Returns whether no separator has an entry.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Debug for Cache {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache").field("initialized", &self.storage.get().is_some()).field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tests::{cycle_graph, path_graph};

    #[test]
    fn negative_results() {
        let graph = cycle_graph(8);
        let separator = graph.edges().subset(&[0, 4]);
        let components = graph.components(&separator).into_graphs();
        assert_eq!(components.len(), 2);

        let cache = Cache::default();
        assert!(!cache.check_negative(&separator, &components));
        assert!(cache.is_empty());

        cache.add_negative(&separator, &components[1]);
        assert!(cache.check_negative(&separator, &components));
        assert!(cache.check_negative(&separator, &components[1..]));
        assert!(!cache.check_negative(&separator, &components[..1]));

        // recording twice changes nothing
        cache.add_negative(&separator, &components[1]);
        assert_eq!(cache.len(), 1);

        let other = graph.edges().subset(&[1, 5]);
        assert!(!cache.check_negative(&other, &components));
    }

    #[test]
    fn positive_results() {
        let graph = path_graph(5);
        let separator = graph.edges().subset(&[2]);
        let components = graph.components(&separator).into_graphs();
        let cache = Cache::default();
        cache.add_positive(&separator, &components[0]);
        assert!(cache.check_positive(&separator, &components[0]));
        assert!(!cache.check_positive(&separator, &components[1]));
        assert!(!cache.check_negative(&separator, &components));
    }

    #[test]
    fn alias_shares_storage() {
        let graph = path_graph(5);
        let separator = graph.edges().subset(&[2]);
        let components = graph.components(&separator).into_graphs();

        let outer = Cache::default();
        let mut inner = Cache::default();
        // neither cache is initialized yet
        inner.alias(&outer);
        inner.add_negative(&separator, &components[0]);
        assert!(outer.check_negative(&separator, &components));

        let clone = outer.clone();
        assert_eq!(clone.len(), 1);
    }

    #[test]
    fn concurrent_updates() {
        use rayon::prelude::*;

        let graph = path_graph(16);
        let cache = Cache::default();
        cache.init();
        (0..16).into_par_iter().for_each(|i| {
            let separator = graph.edges().subset(&[i]);
            for component in graph.components(&separator).graphs() {
                cache.add_negative(&separator, component);
            }
        });
        assert_eq!(cache.len(), 16);
        for i in 0..16 {
            let separator = graph.edges().subset(&[i]);
            assert!(cache.check_negative(&separator, graph.components(&separator).graphs()));
        }
    }
}
