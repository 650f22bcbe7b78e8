use std::fmt;

/// Per-monitor delivery position of an event.
///
/// Delivered events start at 1 and increase by exactly one. Zero is reserved
/// for the single event reporting that the ping process never started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SequenceNumber(pub u64);

impl SequenceNumber {
    /// Sequence number carried by a launch failure event
    pub const PRE_START: SequenceNumber = SequenceNumber(0);

    pub fn next(self) -> Self {
        SequenceNumber(self.0 + 1)
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a single recognized line of ping output (or process failure) means
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The target answered within the tool's timeout window
    Reply { latency_ms: f64 },
    /// The tool reported that no answer arrived in time
    Timeout,
    /// Stderr output, abnormal exit, or a failure to start the tool
    Error { message: String },
}

impl Outcome {
    pub fn latency_ms(&self) -> Option<f64> {
        match self {
            Outcome::Reply { latency_ms } => Some(*latency_ms),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error { .. })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PingEvent {
    pub sequence: SequenceNumber,
    pub outcome: Outcome,
}

impl PingEvent {
    pub fn new(sequence: SequenceNumber, outcome: Outcome) -> Self {
        Self { sequence, outcome }
    }

    /// Build the event reported when the ping process could not be launched
    pub fn launch_failure(message: impl Into<String>) -> Self {
        Self {
            sequence: SequenceNumber::PRE_START,
            outcome: Outcome::Error {
                message: message.into(),
            },
        }
    }

    /// Ping-style one line description, e.g. `Reply seq=3 time=23.4ms`
    pub fn describe(&self) -> String {
        match &self.outcome {
            Outcome::Reply { latency_ms } => {
                format!("Reply seq={} time={}ms", self.sequence, latency_ms)
            }
            Outcome::Timeout => "Request timed out.".to_string(),
            Outcome::Error { message } => format!("Ping error: {}", message),
        }
    }
}
