use crate::event::{Outcome, PingEvent};
use crate::severity::classifier::{color_for, Oklch, SeverityTier};
use colored::*;

const LIGHT: &str = "●";
const IDLE_LIGHT: &str = "○";

/// Short text shown next to the light: `23.4ms`, `Timeout` or `Error`
pub fn label(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Reply { latency_ms } => format!("{}ms", latency_ms),
        Outcome::Timeout => "Timeout".to_string(),
        Outcome::Error { .. } => "Error".to_string(),
    }
}

/// Paint the status light in the given color
pub fn render_light(color: Oklch) -> String {
    let (r, g, b) = color.to_rgb();
    LIGHT.truecolor(r, g, b).bold().to_string()
}

/// Status light tracking the most recent event of a monitor
#[derive(Debug, Default)]
pub struct StatusIndicator {
    last: Option<PingEvent>,
}

impl StatusIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, event: PingEvent) {
        self.last = Some(event);
    }

    pub fn tier(&self) -> Option<SeverityTier> {
        self.last.as_ref().map(|event| SeverityTier::of(&event.outcome))
    }

    /// Render the light and label, or a dim placeholder before the first event
    pub fn render(&self) -> String {
        let Some(event) = &self.last else {
            return format!("{} {}", IDLE_LIGHT.dimmed(), "waiting".dimmed());
        };

        let light = render_light(color_for(&event.outcome));
        let text = format!("{:<10}", label(&event.outcome));
        let text = match &event.outcome {
            Outcome::Error { message } => format!("{} {}", text.bold(), message.dimmed()),
            _ => text.bold().to_string(),
        };
        format!("{} {} seq={}", light, text, event.sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::SequenceNumber;

    #[test]
    fn test_labels() {
        assert_eq!(label(&Outcome::Reply { latency_ms: 42.0 }), "42ms");
        assert_eq!(label(&Outcome::Reply { latency_ms: 23.4 }), "23.4ms");
        assert_eq!(label(&Outcome::Timeout), "Timeout");
        assert_eq!(
            label(&Outcome::Error {
                message: "boom".into()
            }),
            "Error"
        );
    }

    #[test]
    fn test_idle_before_first_event() {
        let indicator = StatusIndicator::new();
        assert_eq!(indicator.tier(), None);
        assert!(indicator.render().contains("waiting"));
    }

    #[test]
    fn test_render_tracks_latest_event() {
        let mut indicator = StatusIndicator::new();
        indicator.update(PingEvent::new(
            SequenceNumber(1),
            Outcome::Reply { latency_ms: 12.5 },
        ));
        let first = indicator.render();
        assert!(first.contains("12.5ms"));
        assert!(first.contains("seq=1"));
        assert_eq!(indicator.tier(), Some(SeverityTier::Good));

        indicator.update(PingEvent::new(SequenceNumber(2), Outcome::Timeout));
        let second = indicator.render();
        assert!(second.contains("Timeout"));
        assert_eq!(indicator.tier(), Some(SeverityTier::Timeout));
        assert_ne!(first, second);
    }

    #[test]
    fn test_error_shows_message() {
        let mut indicator = StatusIndicator::new();
        indicator.update(PingEvent::new(
            SequenceNumber(4),
            Outcome::Error {
                message: "ping: unknown host".into(),
            },
        ));
        assert!(indicator.render().contains("ping: unknown host"));
        assert_eq!(indicator.tier(), Some(SeverityTier::Error));
    }
}
