//! Raw event -> flat, printable record.

pub mod identity;
pub mod parsers;
pub mod stringify;

pub use identity::{guess_event_actor_id, guess_value_id};
pub use parsers::{DefaultParsers, EventParsers, ParsedAction, ParsedComputed, ParsedUpdate};
pub use stringify::stringify;
