//! Weather and flight lookups.
//!
//! Both services sit behind [`DetailsFetcher`], which turns a free-text
//! query into a record. [`CachedFetcher`] adds a short-lived cache in front
//! of any fetcher, and [`fetch_all`] runs several lookups concurrently.

mod cache;
mod error;
mod fetcher;
mod flight;
mod weather;

pub use cache::{CachedFetcher, LookupCacheConfig};
pub use error::LookupError;
pub use fetcher::{DetailsFetcher, fetch_all};
pub use flight::{FlightClient, FlightClientConfig, FlightDetails, FlightSummary};
pub use weather::{Advisory, WeatherClient, WeatherClientConfig, WeatherReport};
