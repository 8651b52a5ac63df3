//! Chat turn orchestration
//!
//! Turns one user message into a stream of [`ChatEvent`]s, running any
//! tools the model asks for along the way.

mod chunk;
mod name;
mod orchestrator;
mod profile;

pub use chunk::chunk_text;
pub use name::extract_name;
pub use orchestrator::{ChatEvent, Orchestrator};
pub use profile::ChatProfile;
