//! Pinglight - continuous latency status light
//!
//! This library drives the operating system's `ping` tool, parses its output
//! into a sequenced stream of replies, timeouts and errors, and maps each event
//! to a status color.

pub mod event;
pub mod monitor;
pub mod severity;
