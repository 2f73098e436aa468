//! A travel session: the route index plus its persisted copy.
//!
//! The session is created once when the application starts. It replays the
//! persisted routes into a fresh index, writes the full list back after
//! every successful insert, and applies the store's exit policy when it is
//! closed.

use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::domain::Route;
use crate::index::{IndexError, LocationIndex};
use crate::store::{ExitPolicy, RouteStore, StoreError};

/// Error from a session operation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SessionError {
    /// The index rejected the route
    #[error(transparent)]
    Index(#[from] IndexError),

    /// The route was indexed but the file could not be written
    #[error("{route} was added but not saved: {source}")]
    Persist { route: Route, source: StoreError },
}

/// One application session over a [`LocationIndex`] and a [`RouteStore`].
#[derive(Debug)]
pub struct TravelSession<R = StdRng> {
    index: LocationIndex<R>,
    store: RouteStore,
}

impl TravelSession<StdRng> {
    /// Open a session, repopulating a fresh index from the store.
    pub fn open(store: RouteStore) -> Self {
        Self::open_with_index(store, LocationIndex::new())
    }
}

impl<R: Rng> TravelSession<R> {
    /// Open a session over an existing (normally empty) index.
    ///
    /// Persisted routes are replayed through [`LocationIndex::insert`], so
    /// duplicates in the file are dropped the same way interactive ones are.
    pub fn open_with_index(store: RouteStore, mut index: LocationIndex<R>) -> Self {
        let persisted = store.load();
        let total = persisted.len();
        let mut skipped = 0;

        for route in persisted {
            if let Err(e) = index.insert(route) {
                debug!(error = %e, "skipping persisted route");
                skipped += 1;
            }
        }

        info!(
            loaded = total - skipped,
            skipped,
            path = %store.path().display(),
            "opened travel session"
        );

        Self { index, store }
    }

    /// Add a route and persist the full list.
    ///
    /// On [`SessionError::Persist`] the route is still in the index; only
    /// the file is behind.
    pub fn add_route(&mut self, origin: &str, destination: &str) -> Result<(), SessionError> {
        let route = Route::new(origin, destination).map_err(IndexError::from)?;
        self.index.insert(route.clone())?;

        if let Err(source) = self.store.save(self.index.all_routes()) {
            warn!(%route, error = %source, "failed to persist route");
            return Err(SessionError::Persist { route, source });
        }

        Ok(())
    }
}

impl<R> TravelSession<R> {
    /// See [`LocationIndex::search_by_prefix`].
    pub fn search_by_prefix(&self, prefix: &str) -> Vec<Route> {
        self.index.search_by_prefix(prefix)
    }

    /// See [`LocationIndex::autocomplete`].
    pub fn autocomplete(&self, prefix: &str) -> Vec<String> {
        self.index.autocomplete(prefix)
    }

    /// See [`LocationIndex::autocomplete_routes`].
    pub fn autocomplete_routes(&self, prefix: &str) -> Vec<Route> {
        self.index.autocomplete_routes(prefix)
    }

    /// All routes in insertion order.
    pub fn routes(&self) -> &[Route] {
        self.index.all_routes()
    }

    /// The underlying index.
    pub fn index(&self) -> &LocationIndex<R> {
        &self.index
    }

    /// End the session, applying the store's exit policy.
    pub fn close(self) -> Result<(), StoreError> {
        match self.store.exit_policy() {
            ExitPolicy::Retain => Ok(()),
            ExitPolicy::Clear => {
                info!(path = %self.store.path().display(), "clearing persisted routes");
                self.store.clear()
            }
        }
    }
}
