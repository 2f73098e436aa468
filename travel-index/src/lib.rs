//! Travel route index.
//!
//! Stores "origin -> destination" routes in a treap (ordered, case-sensitive
//! prefix search) and a trie (case-insensitive autocomplete), persists them
//! to a JSON file between runs, and looks up weather and live flight details
//! for the places involved.

pub mod command;
pub mod config;
pub mod domain;
pub mod index;
pub mod lookup;
pub mod session;
pub mod store;
