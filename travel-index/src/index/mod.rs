//! In-memory route index.
//!
//! Routes are kept in two structures: a treap ordered by the canonical
//! route string, which answers case-sensitive prefix searches in
//! lexicographic order, and a trie over the lowercased strings, which
//! answers case-insensitive autocomplete. [`LocationIndex`] keeps both in
//! step and is the only place duplicates are rejected.

mod location_index;
mod treap;
mod trie;

pub use location_index::{IndexError, LocationIndex};
pub use treap::{MAX_PRIORITY, RouteTreap};
pub use trie::RouteTrie;
