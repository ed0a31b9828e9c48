//! Instrumentation side: the events a reactive-state runtime reports and the
//! source that delivers them.
//!
//! Payloads are mapped into [`value::Value`] at the boundary. The logger never
//! inspects anything outside that closed set.

pub mod event;
pub mod hub;
pub mod value;
