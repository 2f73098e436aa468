//! The location index: one entry point over the treap and the trie.

use std::collections::{HashMap, HashSet};

use rand::Rng;
use rand::rngs::StdRng;

use crate::domain::{Route, RouteError};

use super::treap::RouteTreap;
use super::trie::{RouteTrie, normalize};

/// Error from adding a route to the index.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    /// The same origin and destination are already stored
    #[error("route already exists: {0}")]
    DuplicateRoute(Route),

    /// Origin or destination is not a valid location
    #[error("invalid route: {0}")]
    InvalidRoute(#[from] RouteError),
}

/// In-memory index of travel routes.
///
/// Owns the insertion-ordered list of routes and keeps a treap (ordered,
/// case-sensitive prefix search) and a trie (lowercased autocomplete) in
/// step with it. Routes are never removed.
#[derive(Debug)]
pub struct LocationIndex<R = StdRng> {
    /// Routes in insertion order.
    routes: Vec<Route>,

    /// Set of stored routes, for duplicate detection.
    seen: HashSet<Route>,

    /// Normalized canonical string -> positions in `routes` with that form.
    by_lowercase: HashMap<String, Vec<usize>>,

    treap: RouteTreap<R>,
    trie: RouteTrie,
}

impl LocationIndex<StdRng> {
    /// Create an empty index with treap priorities seeded from OS entropy.
    pub fn new() -> Self {
        Self::from_treap(RouteTreap::new())
    }
}

impl Default for LocationIndex<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> LocationIndex<R> {
    /// Create an empty index whose treap draws priorities from `rng`.
    pub fn with_rng(rng: R) -> Self {
        Self::from_treap(RouteTreap::with_rng(rng))
    }

    fn from_treap(treap: RouteTreap<R>) -> Self {
        Self {
            routes: Vec::new(),
            seen: HashSet::new(),
            by_lowercase: HashMap::new(),
            treap,
            trie: RouteTrie::new(),
        }
    }

    /// Add a route.
    ///
    /// Fails without touching any state if the route is invalid or already
    /// stored. Duplicate detection is exact (case-sensitive), matching the
    /// treap's ordering.
    pub fn add_route(&mut self, origin: &str, destination: &str) -> Result<(), IndexError> {
        let route = Route::new(origin, destination)?;
        self.insert(route)
    }

    /// Add an already-built route. See [`LocationIndex::add_route`].
    pub fn insert(&mut self, route: Route) -> Result<(), IndexError> {
        if self.seen.contains(&route) {
            return Err(IndexError::DuplicateRoute(route));
        }

        let canonical = route.canonical();
        let lowered = normalize(&canonical);

        self.treap.insert(canonical);
        self.trie.insert(&lowered);
        self.by_lowercase
            .entry(lowered)
            .or_default()
            .push(self.routes.len());
        self.seen.insert(route.clone());
        self.routes.push(route);

        Ok(())
    }
}

impl<R> LocationIndex<R> {
    /// Routes whose canonical string starts with `prefix` (case-sensitive),
    /// in lexicographic order. No match is an empty vector.
    pub fn search_by_prefix(&self, prefix: &str) -> Vec<Route> {
        self.treap
            .search_prefix(prefix)
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect()
    }

    /// Lowercased route strings completing `prefix` (case-insensitive).
    pub fn autocomplete(&self, prefix: &str) -> Vec<String> {
        self.trie.search(prefix)
    }

    /// Like [`LocationIndex::autocomplete`], but returns the routes with
    /// their original casing. Routes that differ only in case all appear,
    /// in insertion order.
    pub fn autocomplete_routes(&self, prefix: &str) -> Vec<Route> {
        self.trie
            .search(prefix)
            .iter()
            .filter_map(|lowered| self.by_lowercase.get(lowered))
            .flatten()
            .map(|&idx| self.routes[idx].clone())
            .collect()
    }

    /// All routes in insertion order.
    pub fn all_routes(&self) -> &[Route] {
        &self.routes
    }

    /// Whether the exact route is stored.
    pub fn contains(&self, origin: &str, destination: &str) -> bool {
        Route::new(origin, destination).is_ok_and(|route| self.seen.contains(&route))
    }

    /// Number of stored routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether no route is stored.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Read access to the treap, e.g. for [`RouteTreap::render`].
    pub fn treap(&self) -> &RouteTreap<R> {
        &self.treap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn index() -> LocationIndex {
        LocationIndex::with_rng(StdRng::seed_from_u64(42))
    }

    fn route(origin: &str, destination: &str) -> Route {
        Route::new(origin, destination).unwrap()
    }

    fn sorted(mut v: Vec<String>) -> Vec<String> {
        v.sort();
        v
    }

    #[test]
    fn mumbai_delhi_scenario() {
        let mut index = index();
        index.add_route("Mumbai", "Dubai").unwrap();
        index.add_route("Mumbai", "Bali").unwrap();
        index.add_route("Delhi", "Dubai").unwrap();

        assert_eq!(
            sorted(index.autocomplete("mumbai")),
            vec!["mumbai -> bali", "mumbai -> dubai"]
        );
        assert_eq!(
            index.search_by_prefix("Delhi"),
            vec![route("Delhi", "Dubai")]
        );

        let err = index.add_route("Mumbai", "Dubai").unwrap_err();
        assert_eq!(err, IndexError::DuplicateRoute(route("Mumbai", "Dubai")));
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn duplicate_leaves_state_unchanged() {
        let mut index = index();
        index.add_route("Goa", "Pune").unwrap();
        assert!(index.add_route(" Goa ", "Pune").is_err());

        assert_eq!(index.all_routes(), &[route("Goa", "Pune")]);
        assert_eq!(index.treap().len(), 1);
        assert_eq!(index.autocomplete("goa"), vec!["goa -> pune"]);
    }

    #[test]
    fn invalid_route_rejected() {
        let mut index = index();
        let err = index.add_route("", "Pune").unwrap_err();
        assert_eq!(err, IndexError::InvalidRoute(RouteError::EmptyOrigin));
        assert!(index.is_empty());
        assert!(index.treap().is_empty());
    }

    #[test]
    fn all_routes_keeps_insertion_order() {
        let mut index = index();
        index.add_route("Zurich", "Oslo").unwrap();
        index.add_route("Athens", "Rome").unwrap();
        index.add_route("Lima", "Quito").unwrap();

        let origins: Vec<_> = index.all_routes().iter().map(Route::origin).collect();
        assert_eq!(origins, vec!["Zurich", "Athens", "Lima"]);
    }

    #[test]
    fn search_by_prefix_is_case_sensitive() {
        let mut index = index();
        index.add_route("Delhi", "Dubai").unwrap();

        assert!(index.search_by_prefix("delhi").is_empty());
        assert_eq!(index.search_by_prefix("Delhi -> D").len(), 1);
    }

    #[test]
    fn no_match_is_empty_not_error() {
        let mut index = index();
        index.add_route("Delhi", "Dubai").unwrap();
        assert!(index.search_by_prefix("Paris").is_empty());
        assert!(index.autocomplete("paris").is_empty());
        assert!(index.autocomplete_routes("paris").is_empty());
    }

    #[test]
    fn case_variants_are_distinct_routes() {
        let mut index = index();
        index.add_route("Paris", "Rome").unwrap();
        index.add_route("paris", "rome").unwrap();

        assert_eq!(index.len(), 2);
        // Both collapse to one trie word
        assert_eq!(index.autocomplete("PAR"), vec!["paris -> rome"]);
        assert_eq!(
            index.autocomplete_routes("PAR"),
            vec![route("Paris", "Rome"), route("paris", "rome")]
        );
    }

    #[test]
    fn every_prefix_of_a_greek_route_completes() {
        let mut index = index();
        index.add_route("ΑΣΑ", "ΒΑ").unwrap();

        let canonical = route("ΑΣΑ", "ΒΑ").canonical();
        for (k, _) in canonical.char_indices().skip(1) {
            assert_eq!(
                index.autocomplete(&canonical[..k]),
                vec!["ασα -> βα"],
                "prefix {:?}",
                &canonical[..k]
            );
        }
        assert_eq!(index.autocomplete_routes("ΑΣ"), vec![route("ΑΣΑ", "ΒΑ")]);
    }

    #[test]
    fn autocomplete_routes_keeps_casing() {
        let mut index = index();
        index.add_route("Mumbai", "Dubai").unwrap();
        index.add_route("Delhi", "Dubai").unwrap();

        assert_eq!(
            index.autocomplete_routes("mum"),
            vec![route("Mumbai", "Dubai")]
        );
    }

    #[test]
    fn contains_route() {
        let mut index = index();
        index.add_route("Mumbai", "Dubai").unwrap();
        assert!(index.contains("Mumbai", "Dubai"));
        assert!(index.contains(" Mumbai", "Dubai "));
        assert!(!index.contains("Dubai", "Mumbai"));
        assert!(!index.contains("", ""));
    }

    #[test]
    fn error_display() {
        let err = IndexError::DuplicateRoute(route("Mumbai", "Dubai"));
        assert_eq!(err.to_string(), "route already exists: Mumbai -> Dubai");

        let err = IndexError::InvalidRoute(RouteError::EmptyDestination);
        assert_eq!(err.to_string(), "invalid route: destination must not be empty");
    }
}
