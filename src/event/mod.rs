//! Event types emitted by the ping monitor

pub mod message;

pub use message::{Outcome, PingEvent, SequenceNumber};
