//! JSON file store for the route list.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::Route;

use super::error::StoreError;

/// Default file name, in the current directory.
const DEFAULT_PATH: &str = "locations.json";

/// One persisted route, as written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRoute {
    pub arrival: String,
    pub destination: String,
}

impl From<&Route> for StoredRoute {
    fn from(route: &Route) -> Self {
        Self {
            arrival: route.origin().to_string(),
            destination: route.destination().to_string(),
        }
    }
}

/// Accepted file layouts: a bare list, or the older `{"locations": [...]}`
/// wrapper.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PersistedRoutes {
    List(Vec<StoredRoute>),
    Wrapped {
        #[serde(default)]
        locations: Vec<StoredRoute>,
    },
}

impl PersistedRoutes {
    fn into_entries(self) -> Vec<StoredRoute> {
        match self {
            PersistedRoutes::List(entries) => entries,
            PersistedRoutes::Wrapped { locations } => locations,
        }
    }
}

/// Error returned when parsing an unknown exit policy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid exit policy {0:?}: expected \"retain\" or \"clear\"")]
pub struct InvalidExitPolicy(String);

/// What happens to the route file when a session closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExitPolicy {
    /// Leave the file as it is.
    #[default]
    Retain,
    /// Truncate the file to empty.
    Clear,
}

impl FromStr for ExitPolicy {
    type Err = InvalidExitPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "retain" => Ok(ExitPolicy::Retain),
            "clear" => Ok(ExitPolicy::Clear),
            _ => Err(InvalidExitPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for ExitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitPolicy::Retain => f.write_str("retain"),
            ExitPolicy::Clear => f.write_str("clear"),
        }
    }
}

/// Configuration for the route store.
#[derive(Debug, Clone)]
pub struct RouteStoreConfig {
    /// Path to the JSON file.
    pub path: PathBuf,
    /// What to do with the file when the session closes.
    pub on_exit: ExitPolicy,
}

impl RouteStoreConfig {
    /// Create a config for the given path, retaining the file on exit.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            on_exit: ExitPolicy::default(),
        }
    }

    /// Set the exit policy.
    pub fn with_exit_policy(mut self, on_exit: ExitPolicy) -> Self {
        self.on_exit = on_exit;
        self
    }
}

impl Default for RouteStoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PATH)
    }
}

/// JSON file holding the route list.
#[derive(Debug, Clone)]
pub struct RouteStore {
    config: RouteStoreConfig,
}

impl RouteStore {
    /// Create a store with the given config. Nothing is read yet.
    pub fn new(config: RouteStoreConfig) -> Self {
        Self { config }
    }

    /// Read the persisted routes.
    ///
    /// An absent, empty or unparsable file is [`StoreError::MalformedState`].
    /// Individual entries that do not form a valid route are skipped.
    pub fn try_load(&self) -> Result<Vec<Route>, StoreError> {
        let contents =
            std::fs::read_to_string(&self.config.path).map_err(|e| StoreError::MalformedState {
                reason: format!("cannot read {}: {e}", self.config.path.display()),
            })?;

        if contents.trim().is_empty() {
            return Err(StoreError::MalformedState {
                reason: format!("{} is empty", self.config.path.display()),
            });
        }

        let persisted: PersistedRoutes =
            serde_json::from_str(&contents).map_err(|e| StoreError::MalformedState {
                reason: format!("cannot parse {}: {e}", self.config.path.display()),
            })?;

        let routes = persisted
            .into_entries()
            .into_iter()
            .filter_map(|entry| match Route::new(&entry.arrival, &entry.destination) {
                Ok(route) => Some(route),
                Err(e) => {
                    warn!(?entry, error = %e, "skipping invalid persisted route");
                    None
                }
            })
            .collect();

        Ok(routes)
    }

    /// Read the persisted routes, treating any problem as an empty list.
    pub fn load(&self) -> Vec<Route> {
        self.try_load().unwrap_or_else(|e| {
            debug!(error = %e, "starting with no persisted routes");
            Vec::new()
        })
    }

    /// Write the full route list, replacing the file.
    ///
    /// Creates parent directories if they don't exist.
    pub fn save(&self, routes: &[Route]) -> Result<(), StoreError> {
        if let Some(parent) = self.config.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Write {
                message: format!("failed to create directory: {e}"),
            })?;
        }

        let entries: Vec<StoredRoute> = routes.iter().map(StoredRoute::from).collect();
        let json = serde_json::to_string_pretty(&entries).map_err(|e| StoreError::Write {
            message: format!("failed to serialize routes: {e}"),
        })?;

        std::fs::write(&self.config.path, json).map_err(|e| StoreError::Write {
            message: format!("failed to write {}: {e}", self.config.path.display()),
        })?;

        debug!(count = routes.len(), path = %self.config.path.display(), "saved routes");
        Ok(())
    }

    /// Truncate the file to empty. A missing file is left missing.
    pub fn clear(&self) -> Result<(), StoreError> {
        if !self.config.path.exists() {
            return Ok(());
        }
        std::fs::write(&self.config.path, "").map_err(|e| StoreError::Write {
            message: format!("failed to clear {}: {e}", self.config.path.display()),
        })
    }

    /// Get the file path.
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Get the exit policy.
    pub fn exit_policy(&self) -> ExitPolicy {
        self.config.on_exit
    }
}
