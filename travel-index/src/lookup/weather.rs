//! Current-weather lookups and travel advisories.

use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use super::error::LookupError;
use super::fetcher::{DetailsFetcher, decode_response};

/// Default base URL for the OpenWeatherMap API.
const DEFAULT_BASE_URL: &str = "http://api.openweathermap.org/data/2.5";

/// The API reports temperatures in kelvin.
const KELVIN_OFFSET: f64 = 273.15;

/// Raw current-weather response. Only the fields we use.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherResponse {
    pub main: MainReading,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MainReading {
    /// Kelvin.
    pub temp: f64,
    /// Percent.
    pub humidity: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Condition {
    pub description: String,
}

/// Advice attached to a weather report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    Sunscreen,
    Umbrella,
    WarmClothes,
    Heat,
    Snow,
}

impl Advisory {
    /// Advisories for a temperature and condition description, in a fixed
    /// order. Description matching ignores case.
    pub fn for_conditions(temperature_celsius: f64, description: &str) -> Vec<Advisory> {
        let description = description.to_lowercase();
        let mut advisories = Vec::new();

        if temperature_celsius > 35.0 && description.contains("sun") {
            advisories.push(Advisory::Sunscreen);
        }
        if description.contains("cloud") || description.contains("rain") {
            advisories.push(Advisory::Umbrella);
        }
        if temperature_celsius < 20.0 {
            advisories.push(Advisory::WarmClothes);
        }
        if temperature_celsius > 45.0 {
            advisories.push(Advisory::Heat);
        }
        if description.contains("snow") {
            advisories.push(Advisory::Snow);
        }

        advisories
    }

    /// Human-readable advice.
    pub fn message(&self) -> &'static str {
        match self {
            Advisory::Sunscreen => {
                "It's sunny and the temperature is high. Put on sunscreen and wear loose, comfortable cotton clothes."
            }
            Advisory::Umbrella => "It's cloudy or rainy. Bring an umbrella.",
            Advisory::WarmClothes => "The temperature is below 20°C. Bring warm clothes.",
            Advisory::Heat => {
                "The temperature is very high. Stay indoors and drink plenty of water to avoid heatstroke."
            }
            Advisory::Snow => "It's snowy. Wear snow boots and clothes that keep you dry.",
        }
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Current weather at a location.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub location: String,
    pub temperature_celsius: f64,
    pub humidity: u32,
    pub description: String,
    pub advisories: Vec<Advisory>,
}

impl WeatherReport {
    /// Build a report from a raw response. The first condition is used as
    /// the description.
    pub fn from_response(location: &str, response: WeatherResponse) -> Self {
        let temperature_celsius = response.main.temp - KELVIN_OFFSET;
        let description = response
            .weather
            .into_iter()
            .next()
            .map(|c| c.description)
            .unwrap_or_default();
        let advisories = Advisory::for_conditions(temperature_celsius, &description);

        Self {
            location: location.to_string(),
            temperature_celsius,
            humidity: response.main.humidity,
            description,
            advisories,
        }
    }
}

impl fmt::Display for WeatherReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Weather in {}:", self.location)?;
        writeln!(f, "Temperature: {:.2}°C", self.temperature_celsius)?;
        writeln!(f, "Humidity: {}%", self.humidity)?;
        write!(f, "Description: {}", self.description)?;
        for advisory in &self.advisories {
            write!(f, "\n{advisory}")?;
        }
        Ok(())
    }
}

/// Configuration for the weather client.
#[derive(Debug, Clone)]
pub struct WeatherClientConfig {
    /// API key, sent as the `appid` query parameter
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl WeatherClientConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
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

/// Client for the current-weather API.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl WeatherClient {
    /// Create a new weather client.
    pub fn new(config: WeatherClientConfig) -> Result<Self, LookupError> {
        if config.api_key.trim().is_empty() {
            return Err(LookupError::NotConfigured(
                "weather API key is empty".to_string(),
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_key: config.api_key,
            base_url: config.base_url,
        })
    }

    /// Fetch the current weather for a location name.
    pub async fn fetch(&self, location: &str) -> Result<WeatherReport, LookupError> {
        let url = format!("{}/weather", self.base_url);
        debug!(location, "fetching weather");

        let response = self
            .http
            .get(&url)
            .query(&[("appid", self.api_key.as_str()), ("q", location)])
            .send()
            .await?;

        let body: WeatherResponse = decode_response(response, location).await?;
        Ok(WeatherReport::from_response(location, body))
    }
}

impl DetailsFetcher for WeatherClient {
    type Record = WeatherReport;

    async fn fetch_details(&self, query: &str) -> Result<WeatherReport, LookupError> {
        self.fetch(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(kelvin: f64, humidity: u32, description: &str) -> WeatherResponse {
        WeatherResponse {
            main: MainReading {
                temp: kelvin,
                humidity,
            },
            weather: vec![Condition {
                description: description.to_string(),
            }],
        }
    }

    #[test]
    fn parses_api_body() {
        let json = r#"{
            "coord": {"lon": 72.85, "lat": 19.01},
            "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
            "main": {"temp": 300.15, "feels_like": 303.0, "humidity": 83},
            "name": "Mumbai"
        }"#;
        let body: WeatherResponse = serde_json::from_str(json).unwrap();
        let report = WeatherReport::from_response("Mumbai", body);

        assert_eq!(report.location, "Mumbai");
        assert!((report.temperature_celsius - 27.0).abs() < 1e-9);
        assert_eq!(report.humidity, 83);
        assert_eq!(report.description, "light rain");
        assert_eq!(report.advisories, vec![Advisory::Umbrella]);
    }

    #[test]
    fn missing_conditions_give_empty_description() {
        let body: WeatherResponse =
            serde_json::from_str(r#"{"main": {"temp": 293.15, "humidity": 40}}"#).unwrap();
        let report = WeatherReport::from_response("Nowhere", body);
        assert_eq!(report.description, "");
        assert!(report.advisories.is_empty());
    }

    #[test]
    fn hot_and_sunny() {
        let advisories = Advisory::for_conditions(38.0, "Sunny intervals");
        assert_eq!(advisories, vec![Advisory::Sunscreen]);
    }

    #[test]
    fn extreme_heat_with_sun() {
        let advisories = Advisory::for_conditions(47.0, "sun");
        assert_eq!(advisories, vec![Advisory::Sunscreen, Advisory::Heat]);
    }

    #[test]
    fn cold_and_snowy() {
        let advisories = Advisory::for_conditions(-3.0, "Light SNOW, broken clouds");
        assert_eq!(
            advisories,
            vec![Advisory::Umbrella, Advisory::WarmClothes, Advisory::Snow]
        );
    }

    #[test]
    fn mild_clear_day_needs_nothing() {
        assert!(Advisory::for_conditions(24.0, "clear sky").is_empty());
    }

    #[test]
    fn boundaries_are_exclusive() {
        assert!(Advisory::for_conditions(35.0, "sunny").is_empty());
        assert!(Advisory::for_conditions(20.0, "clear").is_empty());
        assert_eq!(
            Advisory::for_conditions(45.0, "clear"),
            Vec::<Advisory>::new()
        );
    }

    #[test]
    fn report_display() {
        let report = WeatherReport::from_response("Oslo", response(278.15, 70, "overcast clouds"));
        let text = report.to_string();

        assert!(text.starts_with("Weather in Oslo:\nTemperature: 5.00°C\nHumidity: 70%\n"));
        assert!(text.contains("Description: overcast clouds"));
        assert!(text.contains(Advisory::Umbrella.message()));
        assert!(text.contains(Advisory::WarmClothes.message()));
    }

    #[test]
    fn config_defaults() {
        let config = WeatherClientConfig::new("key");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);

        let config = config.with_base_url("http://localhost:8080");
        assert_eq!(config.base_url, "http://localhost:8080");
    }

    #[test]
    fn empty_key_is_not_configured() {
        let err = WeatherClient::new(WeatherClientConfig::new("  ")).unwrap_err();
        assert!(matches!(err, LookupError::NotConfigured(_)));
    }
}
