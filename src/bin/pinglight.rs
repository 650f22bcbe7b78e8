use anyhow::{bail, Result};
use clap::Parser;
use pinglight::event::{Outcome, PingEvent};
use pinglight::monitor::{init_logging_with_config, MonitorConfig, PingMonitor};
use pinglight::severity::{SeverityTier, StatusLine};
use std::sync::mpsc::RecvTimeoutError;
use std::time::Instant;
use tracing::{debug, error, info, warn};

fn main() {
    // Parse CLI arguments
    let config = MonitorConfig::parse();

    init_logging_with_config(&config.log_level, config.is_json_format());

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        eprintln!("{}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(config) {
        error!(error = %e, "Monitor failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(config: MonitorConfig) -> Result<()> {
    let monitor = PingMonitor::with_command(config.command());
    info!(
        target_host = %config.target,
        command = %monitor.command(),
        duration_secs = config.duration_secs,
        "Starting pinglight"
    );

    let mut status = if config.quiet {
        info!("Running in quiet mode (status line disabled)");
        None
    } else {
        Some(StatusLine::new(&config.target)?)
    };

    let (handle, events) = monitor.subscribe();
    let deadline = config.duration().map(|d| Instant::now() + d);
    let mut last_event: Option<PingEvent> = None;

    loop {
        let event = match deadline {
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                match events.recv_timeout(remaining) {
                    Ok(event) => event,
                    Err(RecvTimeoutError::Timeout) => {
                        debug!("Run duration elapsed");
                        break;
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match events.recv() {
                Ok(event) => event,
                Err(_) => break,
            },
        };

        log_event(&event);
        if let Some(status) = status.as_mut() {
            status.update(event.clone());
        }
        last_event = Some(event);
    }

    // Channel closed before the deadline: the process died or never started
    let ended_on_its_own = !handle.is_running();
    handle.stop();
    if let Some(status) = &status {
        status.finish();
    }

    if ended_on_its_own {
        if let Some(PingEvent {
            outcome: Outcome::Error { message },
            ..
        }) = &last_event
        {
            bail!("ping stopped: {}", message);
        }
    }

    info!("pinglight finished");
    Ok(())
}

fn log_event(event: &PingEvent) {
    let tier = SeverityTier::of(&event.outcome);
    match &event.outcome {
        Outcome::Reply { latency_ms } => {
            info!(
                sequence = event.sequence.0,
                latency_ms = *latency_ms,
                tier = tier.label(),
                "{}",
                event.describe()
            );
        }
        Outcome::Timeout => {
            warn!(
                sequence = event.sequence.0,
                tier = tier.label(),
                "{}",
                event.describe()
            );
        }
        Outcome::Error { .. } => {
            error!(
                sequence = event.sequence.0,
                tier = tier.label(),
                "{}",
                event.describe()
            );
        }
    }
}
