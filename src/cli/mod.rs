//! Command-line interface.

pub mod args;
pub mod replay;

pub use args::Args;
pub use replay::{parse_event_log, EventLog};
