//! Commands accepted by the terminal driver.

use std::fmt;

use crate::domain::SEPARATOR;

/// Help text listing every command.
pub const HELP: &str = "\
commands:
  add <origin> -> <destination>   store a route
  search <prefix>                 routes starting with <prefix> (case-sensitive)
  complete <prefix>               autocomplete (case-insensitive)
  list                            all routes in the order they were added
  tree                            dump the route treap
  weather <place>[, <place>...]   current weather and advice
  flight <iata>                   details for one flight
  flight <from> -> <to>           first flight between two airports (IATA codes)
  flight #<n>                     details for flight <n> of the last \"flights\" listing
  flights                         numbered list of flights in the live feed
  help                            this text
  quit                            end the session";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { origin: String, destination: String },
    Search(String),
    Complete(String),
    List,
    Tree,
    Weather(Vec<String>),
    Flight(String),
    RouteFlight { origin: String, destination: String },
    /// 1-based position in the last `flights` listing.
    PickFlight(usize),
    Flights,
    Help,
    Quit,
}

/// Error from parsing an input line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("empty input")]
    Empty,

    #[error("unknown command {0:?} (try \"help\")")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("invalid index {index}: {listed} flights listed (run \"flights\" first)")]
    InvalidIndex { index: usize, listed: usize },
}

const FLIGHT_USAGE: &str = "flight <iata> | flight <from> -> <to> | flight #<n>";

impl Command {
    /// Parse one line of input. The command word is case-insensitive.
    ///
    /// `search` and `complete` keep their argument verbatim after the first
    /// space so that prefixes may end in whitespace (e.g. `"Mumbai "`).
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let line = line.trim_end_matches(['\r', '\n']);
        let trimmed = line.trim_start();
        if trimmed.trim().is_empty() {
            return Err(CommandError::Empty);
        }

        let (word, rest) = match trimmed.split_once(' ') {
            Some((word, rest)) => (word, rest),
            None => (trimmed, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "add" => {
                let (origin, destination) = rest
                    .split_once(SEPARATOR.trim())
                    .ok_or(CommandError::Usage("add <origin> -> <destination>"))?;
                Ok(Command::Add {
                    origin: origin.trim().to_string(),
                    destination: destination.trim().to_string(),
                })
            }
            "search" => Ok(Command::Search(rest.to_string())),
            "complete" => Ok(Command::Complete(rest.to_string())),
            "list" => Ok(Command::List),
            "tree" => Ok(Command::Tree),
            "weather" => {
                let places: Vec<String> = rest
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect();
                if places.is_empty() {
                    return Err(CommandError::Usage("weather <place>[, <place>...]"));
                }
                Ok(Command::Weather(places))
            }
            "flight" => parse_flight(rest.trim()),
            "flights" => Ok(Command::Flights),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn parse_flight(arg: &str) -> Result<Command, CommandError> {
    if arg.is_empty() {
        return Err(CommandError::Usage(FLIGHT_USAGE));
    }

    if let Some(number) = arg.strip_prefix('#') {
        return match number.trim().parse::<usize>() {
            Ok(n) if n > 0 => Ok(Command::PickFlight(n)),
            _ => Err(CommandError::Usage(FLIGHT_USAGE)),
        };
    }

    if let Some((origin, destination)) = arg.split_once(SEPARATOR.trim()) {
        let (origin, destination) = (origin.trim(), destination.trim());
        if origin.is_empty() || destination.is_empty() {
            return Err(CommandError::Usage(FLIGHT_USAGE));
        }
        return Ok(Command::RouteFlight {
            origin: origin.to_string(),
            destination: destination.to_string(),
        });
    }

    Ok(Command::Flight(arg.to_string()))
}

/// Lines of `items` prefixed with their 1-based position: `"1. ..."`.
pub fn numbered<T: fmt::Display>(items: &[T]) -> Vec<String> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {item}", i + 1))
        .collect()
}

/// The item at 1-based position `number` of a numbered listing.
pub fn select<T>(listed: &[T], number: usize) -> Result<&T, CommandError> {
    number
        .checked_sub(1)
        .and_then(|i| listed.get(i))
        .ok_or(CommandError::InvalidIndex {
            index: number,
            listed: listed.len(),
        })
}
