//! Domain types for the travel location index.
//!
//! All types enforce their invariants at construction time, so code that
//! receives them can trust their validity.

mod route;

pub use route::{Route, RouteError, SEPARATOR};
