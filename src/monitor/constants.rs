//! Constants used throughout the monitor

/// Name of the platform ping executable, resolved through `PATH`
pub const PING_PROGRAM: &str = "ping";

/// Flag that makes Windows `ping` run until killed
pub const WINDOWS_CONTINUOUS_FLAG: &str = "-t";

/// Host pinged when none is given on the command line
pub const DEFAULT_TARGET: &str = "www.google.com.br";

/// Size of each read from the child's output pipes
pub const READ_CHUNK_SIZE: usize = 4096;

/// Status line spinner tick interval in milliseconds
pub const STATUS_TICK_INTERVAL_MS: u64 = 120;

/// Upper bound of the "good" latency tier in milliseconds
pub const GOOD_LATENCY_MS: f64 = 50.0;

/// Upper bound of the "okay" latency tier in milliseconds
pub const OKAY_LATENCY_MS: f64 = 150.0;

/// Latencies above this value are treated as this value when coloring
pub const MAX_CLASSIFIED_LATENCY_MS: f64 = 300.0;

/// Longest line kept while waiting for a terminator; longer output is flushed as is
pub const MAX_LINE_BYTES: usize = 64 * 1024;
