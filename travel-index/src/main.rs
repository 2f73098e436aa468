use std::io::Write;
use std::process::ExitCode;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use travel_index::command::{Command, CommandError, HELP, numbered, select};
use travel_index::config::{AppConfig, FLIGHT_KEY_VAR, WEATHER_KEY_VAR};
use travel_index::lookup::{
    CachedFetcher, DetailsFetcher, FlightClient, FlightClientConfig, FlightSummary,
    LookupCacheConfig, LookupError, WeatherClient, WeatherClientConfig, fetch_all,
};
use travel_index::session::TravelSession;
use travel_index::store::RouteStore;

/// Lookup services that were configured at startup.
struct Lookups {
    weather: Option<CachedFetcher<WeatherClient>>,
    flight: Option<CachedFetcher<FlightClient>>,

    /// The last `flights` listing, for `flight #<n>`.
    listed_flights: Vec<FlightSummary>,
}

impl Lookups {
    fn from_config(config: &AppConfig) -> Self {
        let weather = match &config.weather_api_key {
            Some(key) => cached(
                WeatherClient::new(WeatherClientConfig::new(key)),
                &config.lookup_cache,
            ),
            None => {
                warn!("{WEATHER_KEY_VAR} not set; weather lookups disabled");
                None
            }
        };

        let flight = match &config.flight_api_key {
            Some(key) => cached(
                FlightClient::new(FlightClientConfig::new(key)),
                &config.lookup_cache,
            ),
            None => {
                warn!("{FLIGHT_KEY_VAR} not set; flight lookups disabled");
                None
            }
        };

        Self {
            weather,
            flight,
            listed_flights: Vec::new(),
        }
    }
}

fn cached<F>(
    client: Result<F, LookupError>,
    config: &LookupCacheConfig,
) -> Option<CachedFetcher<F>>
where
    F: DetailsFetcher,
    F::Record: Clone + Send + Sync + 'static,
{
    match client {
        Ok(client) => Some(CachedFetcher::new(client, config)),
        Err(e) => {
            warn!(error = %e, "lookup client unavailable");
            None
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let mut lookups = Lookups::from_config(&config);
    let mut session = TravelSession::open(RouteStore::new(config.store));

    println!("Travel route index. Type \"help\" for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        if let Err(e) = std::io::stdout().flush() {
            warn!(error = %e, "failed to flush prompt");
        }

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "failed to read input");
                break;
            }
        };

        match Command::parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => run(command, &mut session, &mut lookups).await,
            Err(CommandError::Empty) => {}
            Err(e) => println!("{e}"),
        }
    }

    if let Err(e) = session.close() {
        error!(error = %e, "failed to apply exit policy");
        return ExitCode::FAILURE;
    }

    info!("session closed");
    ExitCode::SUCCESS
}

async fn run(command: Command, session: &mut TravelSession, lookups: &mut Lookups) {
    match command {
        Command::Add {
            origin,
            destination,
        } => match session.add_route(&origin, &destination) {
            Ok(()) => println!("Added {origin} -> {destination}"),
            Err(e) => println!("{e}"),
        },
        Command::Search(prefix) => {
            let routes = session.search_by_prefix(&prefix);
            if routes.is_empty() {
                println!("No routes start with {prefix:?}");
            }
            for route in routes {
                println!("{route}");
            }
        }
        Command::Complete(prefix) => {
            let routes = session.autocomplete_routes(&prefix);
            if routes.is_empty() {
                println!("No suggestions for {prefix:?}");
            }
            for route in routes {
                println!("{route}");
            }
        }
        Command::List => {
            if session.routes().is_empty() {
                println!("No routes stored");
            }
            for route in session.routes() {
                println!("{route}");
            }
        }
        Command::Tree => {
            let tree = session.index().treap().render();
            if tree.is_empty() {
                println!("(empty)");
            } else {
                print!("{tree}");
            }
        }
        Command::Weather(places) => {
            let Some(weather) = &lookups.weather else {
                println!("Weather lookups are not configured (set {WEATHER_KEY_VAR})");
                return;
            };
            for (place, result) in fetch_all(weather, &places).await {
                match result {
                    Ok(report) => println!("{report}\n"),
                    Err(e) => println!("{place}: {e}\n"),
                }
            }
        }
        Command::Flight(iata) => {
            let Some(flight) = &lookups.flight else {
                println!("Flight lookups are not configured (set {FLIGHT_KEY_VAR})");
                return;
            };
            match flight.fetch_details(&iata).await {
                Ok(details) => print!("{details}"),
                Err(e) => println!("{iata}: {e}"),
            }
        }
        Command::RouteFlight {
            origin,
            destination,
        } => {
            let Some(flight) = &lookups.flight else {
                println!("Flight lookups are not configured (set {FLIGHT_KEY_VAR})");
                return;
            };
            match flight.inner().fetch_route(&origin, &destination).await {
                Ok(details) => print!("{details}"),
                Err(e) => println!("{origin} -> {destination}: {e}"),
            }
        }
        Command::PickFlight(number) => {
            let Some(flight) = &lookups.flight else {
                println!("Flight lookups are not configured (set {FLIGHT_KEY_VAR})");
                return;
            };
            let iata = match select(&lookups.listed_flights, number) {
                Ok(summary) => summary.iata.clone(),
                Err(e) => {
                    println!("{e}");
                    return;
                }
            };
            match flight.fetch_details(&iata).await {
                Ok(details) => print!("{details}"),
                Err(e) => println!("{iata}: {e}"),
            }
        }
        Command::Flights => {
            let Some(flight) = &lookups.flight else {
                println!("Flight lookups are not configured (set {FLIGHT_KEY_VAR})");
                return;
            };
            match flight.inner().list_flights().await {
                Ok(flights) => {
                    if flights.is_empty() {
                        println!("No flights in the feed");
                    }
                    for line in numbered(&flights) {
                        println!("{line}");
                    }
                    lookups.listed_flights = flights;
                }
                Err(e) => println!("{e}"),
            }
        }
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
}
