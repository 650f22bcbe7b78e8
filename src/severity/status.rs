use crate::event::PingEvent;
use crate::monitor::constants::STATUS_TICK_INTERVAL_MS;
use crate::monitor::error::{MonitorError, Result};
use crate::severity::indicator::StatusIndicator;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Live one-line status display for a running monitor
pub struct StatusLine {
    pb: ProgressBar,
    indicator: StatusIndicator,
}

impl StatusLine {
    /// Create a status line labelled with `target`
    pub fn new(target: &str) -> Result<Self> {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold} {msg} [{elapsed_precise}]")
                .map_err(|e| {
                    MonitorError::Display(format!("Failed to create status style: {}", e))
                })?,
        );
        pb.set_prefix(target.to_string());
        pb.enable_steady_tick(Duration::from_millis(STATUS_TICK_INTERVAL_MS));

        let line = Self {
            pb,
            indicator: StatusIndicator::new(),
        };
        line.redraw();
        Ok(line)
    }

    /// Show the latest event
    pub fn update(&mut self, event: PingEvent) {
        self.indicator.update(event);
        self.redraw();
    }

    fn redraw(&self) {
        self.pb.set_message(self.indicator.render());
    }

    /// Leave the last status on screen and stop the spinner
    pub fn finish(&self) {
        self.pb.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Outcome, SequenceNumber};

    #[test]
    fn test_status_line_accepts_events() -> Result<()> {
        let mut line = StatusLine::new("1.1.1.1")?;
        line.update(PingEvent::new(SequenceNumber(1), Outcome::Timeout));
        line.update(PingEvent::new(
            SequenceNumber(2),
            Outcome::Reply { latency_ms: 80.0 },
        ));
        line.finish();
        Ok(())
    }
}
