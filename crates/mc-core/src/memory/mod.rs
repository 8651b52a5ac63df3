//! Memory system for mc-core
//!
//! Persistent key/value facts about the user, stored in a single SQLite
//! table and addressed by unique key.

mod store;
mod types;

pub use store::MemoryStore;
pub use types::{
    AddOutcome, GetOutcome, ListOutcome, Memory, MemoryEntry, SearchOutcome, UpdateOutcome,
};
