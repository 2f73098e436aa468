//! Live flight lookups.

use std::fmt;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use tracing::debug;

use super::error::LookupError;
use super::fetcher::{DetailsFetcher, decode_response};

/// Default base URL for the aviationstack API.
const DEFAULT_BASE_URL: &str = "http://api.aviationstack.com/v1";

/// Placeholder for fields the API left out.
const UNKNOWN: &str = "unknown";

/// Treat an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Raw flights response.
#[derive(Debug, Clone, Deserialize)]
pub struct FlightsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<FlightRecord>,
}

/// One flight as the API reports it. Every field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightRecord {
    pub flight_date: Option<String>,
    pub flight_status: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub departure: FlightEndpoint,
    #[serde(default, deserialize_with = "null_as_default")]
    pub arrival: FlightEndpoint,
    #[serde(default, deserialize_with = "null_as_default")]
    pub airline: AirlineDto,
    #[serde(default, deserialize_with = "null_as_default")]
    pub flight: FlightNumberDto,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightEndpoint {
    pub airport: Option<String>,
    pub estimated: Option<String>,
    pub terminal: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AirlineDto {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlightNumberDto {
    pub iata: Option<String>,
}

/// Details of a single flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightDetails {
    pub flight_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub departure_airport: Option<String>,
    pub departure_time: Option<String>,
    pub terminal: Option<String>,
    pub landing_time: Option<String>,
    pub arrival_airport: Option<String>,
    pub airline: Option<String>,
    pub iata: Option<String>,
}

impl From<FlightRecord> for FlightDetails {
    fn from(record: FlightRecord) -> Self {
        Self {
            flight_date: record
                .flight_date
                .as_deref()
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
            status: record.flight_status,
            departure_airport: record.departure.airport,
            departure_time: record.departure.estimated,
            terminal: record.departure.terminal,
            landing_time: record.arrival.estimated,
            arrival_airport: record.arrival.airport,
            airline: record.airline.name,
            iata: record.flight.iata,
        }
    }
}

impl FlightDetails {
    /// Labelled fields in display order. Missing values read "unknown".
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        let text = |v: &Option<String>| v.clone().unwrap_or_else(|| UNKNOWN.to_string());
        vec![
            (
                "Flight Date",
                self.flight_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| UNKNOWN.to_string()),
            ),
            ("Flight Status", text(&self.status)),
            ("Departure Airport", text(&self.departure_airport)),
            ("Departure Time", text(&self.departure_time)),
            ("Terminal", text(&self.terminal)),
            ("Landing Time", text(&self.landing_time)),
            ("Arrival Airport", text(&self.arrival_airport)),
            ("Airline Name", text(&self.airline)),
            ("IATA Number", text(&self.iata)),
        ]
    }
}

impl fmt::Display for FlightDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, value) in self.fields() {
            writeln!(f, "{label}: {value}")?;
        }
        Ok(())
    }
}

/// Short listing entry for the live flights feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightSummary {
    pub iata: String,
    pub airline: String,
    pub departure_airport: String,
    pub arrival_airport: String,
}

impl From<&FlightRecord> for FlightSummary {
    fn from(record: &FlightRecord) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_else(|| UNKNOWN.to_string());
        Self {
            iata: text(&record.flight.iata),
            airline: text(&record.airline.name),
            departure_airport: text(&record.departure.airport),
            arrival_airport: text(&record.arrival.airport),
        }
    }
}

impl fmt::Display for FlightSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}: {} to {}",
            self.iata, self.airline, self.departure_airport, self.arrival_airport
        )
    }
}

/// Configuration for the flight client.
#[derive(Debug, Clone)]
pub struct FlightClientConfig {
    /// Access key, sent as the `access_key` query parameter
    pub access_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl FlightClientConfig {
    /// Create a new config with the given access key.
    pub fn new(access_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// Client for the live flights API.
#[derive(Debug, Clone)]
pub struct FlightClient {
    http: reqwest::Client,
    access_key: String,
    base_url: String,
}

impl FlightClient {
    /// Create a new flight client.
    pub fn new(config: FlightClientConfig) -> Result<Self, LookupError> {
        if config.access_key.trim().is_empty() {
            return Err(LookupError::NotConfigured(
                "flight API key is empty".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            access_key: config.access_key,
            base_url: config.base_url,
        })
    }

    /// Fetch details for one flight by IATA number (e.g. `AI101`).
    pub async fn fetch(&self, iata: &str) -> Result<FlightDetails, LookupError> {
        let iata = iata.trim();
        debug!(iata, "fetching flight");

        let response = self.get(&[("flight_iata", iata)], iata).await?;
        details_from_response(response, iata)
    }

    /// Fetch the first flight between two airports, by IATA code.
    pub async fn fetch_route(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<FlightDetails, LookupError> {
        let (origin, destination) = (origin.trim(), destination.trim());
        debug!(origin, destination, "fetching route flight");

        let query = format!("{origin} -> {destination}");
        let response = self.get(&route_params(origin, destination), &query).await?;
        details_from_response(response, &query)
    }

    /// List the flights currently in the live feed.
    pub async fn list_flights(&self) -> Result<Vec<FlightSummary>, LookupError> {
        let response = self.get(&[], "flights").await?;
        Ok(response.data.iter().map(FlightSummary::from).collect())
    }

    async fn get(
        &self,
        params: &[(&str, &str)],
        query: &str,
    ) -> Result<FlightsResponse, LookupError> {
        let url = format!("{}/flights", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("access_key", self.access_key.as_str())])
            .query(params)
            .send()
            .await?;

        decode_response(response, query).await
    }
}

/// Query parameters for the first flight from `origin` to `destination`.
fn route_params<'a>(origin: &'a str, destination: &'a str) -> [(&'static str, &'a str); 3] {
    [
        ("dep_iata", origin.trim()),
        ("arr_iata", destination.trim()),
        ("limit", "1"),
    ]
}

/// The first record of a response, or [`LookupError::NotFound`].
fn details_from_response(
    response: FlightsResponse,
    iata: &str,
) -> Result<FlightDetails, LookupError> {
    response
        .data
        .into_iter()
        .next()
        .map(FlightDetails::from)
        .ok_or_else(|| LookupError::NotFound {
            query: iata.to_string(),
        })
}

impl DetailsFetcher for FlightClient {
    type Record = FlightDetails;

    async fn fetch_details(&self, query: &str) -> Result<FlightDetails, LookupError> {
        self.fetch(query).await
    }
}
