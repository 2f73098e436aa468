//! Route value type.

use std::fmt;
use std::str::FromStr;

/// Separator between origin and destination in the canonical form.
pub const SEPARATOR: &str = " -> ";

/// Error returned when a route cannot be built or parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// Origin is empty after trimming
    #[error("origin must not be empty")]
    EmptyOrigin,

    /// Destination is empty after trimming
    #[error("destination must not be empty")]
    EmptyDestination,

    /// A field contains the route separator
    #[error("location {0:?} must not contain \"{SEPARATOR}\"")]
    ContainsSeparator(String),

    /// Canonical string has no separator
    #[error("missing \"{SEPARATOR}\" in {0:?}")]
    MissingSeparator(String),
}

/// A directed origin → destination pair.
///
/// Both locations are trimmed and non-empty, and neither contains the
/// separator, so the canonical string `"origin -> destination"` always
/// parses back to the same route.
///
/// # Examples
///
/// ```
/// use travel_index::domain::Route;
///
/// let route = Route::new(" Mumbai ", "Dubai").unwrap();
/// assert_eq!(route.to_string(), "Mumbai -> Dubai");
///
/// let parsed: Route = "Mumbai -> Dubai".parse().unwrap();
/// assert_eq!(parsed, route);
///
/// // Blank locations are rejected
/// assert!(Route::new("Mumbai", "  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Route {
    origin: String,
    destination: String,
}

impl Route {
    /// Build a route from an origin and a destination.
    pub fn new(origin: &str, destination: &str) -> Result<Self, RouteError> {
        let origin = origin.trim();
        let destination = destination.trim();

        if origin.is_empty() {
            return Err(RouteError::EmptyOrigin);
        }
        if destination.is_empty() {
            return Err(RouteError::EmptyDestination);
        }

        for field in [origin, destination] {
            if field.contains(SEPARATOR) {
                return Err(RouteError::ContainsSeparator(field.to_string()));
            }
        }
        // "A ->" followed by the separator would split one place too early
        if origin.ends_with(SEPARATOR.trim_end()) {
            return Err(RouteError::ContainsSeparator(origin.to_string()));
        }

        Ok(Self {
            origin: origin.to_string(),
            destination: destination.to_string(),
        })
    }

    /// Where the route starts.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Where the route ends.
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// The canonical `"origin -> destination"` string.
    pub fn canonical(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.origin, self.destination)
    }
}

impl FromStr for Route {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (origin, destination) = s
            .split_once(SEPARATOR)
            .ok_or_else(|| RouteError::MissingSeparator(s.to_string()))?;
        Route::new(origin, destination)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Display then parse returns the original route
        #[test]
        fn roundtrip(origin in "[A-Za-z][A-Za-z ]{0,15}[A-Za-z]", destination in "[A-Za-z]{1,16}") {
            let route = Route::new(&origin, &destination).unwrap();
            let parsed: Route = route.to_string().parse().unwrap();
            prop_assert_eq!(parsed, route);
        }
    }
}
