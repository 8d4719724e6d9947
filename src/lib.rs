//! Compound-aware spelling correction.
//!
//! A frequency dictionary is indexed by symmetric deletes: every word maps
//! back from each variant reachable by removing up to a configured number
//! of chars from its prefix. Lookup enumerates the query's own deletion
//! variants, meets the dictionary in that shared space, and verifies the
//! survivors with a pluggable Damerau-Levenshtein distance. On top of
//! single-term lookup, [`SymSpell::lookup_compound`] resolves whole
//! strings, joining tokens whose separating space was spurious and
//! splitting tokens whose space went missing.

mod compound;
mod config;
mod dictionary;
mod distance;
mod error;
mod persistence;
mod symspell;

pub use config::Config;
pub use distance::{DamerauLevenshtein, EditDistance};
pub use error::Error;
pub use symspell::{
    Suggestion, SymSpell, Verbosity, DEFAULT_COUNT_THRESHOLD, DEFAULT_MAX_EDIT_DISTANCE,
    DEFAULT_PREFIX_LENGTH,
};
