//! Mapping ping events to status-light colors and rendering them in a terminal

pub mod classifier;
pub mod indicator;
pub mod status;

pub use classifier::{classify, color_for, Oklch, SeverityTier, ERROR_COLOR, GOOD_COLOR, TIMEOUT_COLOR};
pub use indicator::StatusIndicator;
pub use status::StatusLine;
