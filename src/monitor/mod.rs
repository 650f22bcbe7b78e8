//! Ping monitor: drives the system ping tool and turns its output into events

pub mod command;
pub mod config;
pub mod constants;
pub mod dispatcher;
pub mod error;
pub mod lines;
pub mod logging;
pub mod parser;
pub mod process;

pub use command::PingCommand;
pub use config::MonitorConfig;
pub use constants::*;
pub use dispatcher::{CallbackObserver, Dispatcher, EventObserver, StopGate, Stream};
pub use error::{MonitorError, Result};
pub use lines::LineBuffer;
pub use logging::init_logging_with_config;
pub use parser::{is_timeout_line, parse_latency, parse_line, ParsedLine};
pub use process::{start, start_with_command, MonitorHandle, PingMonitor};
