//! Monitor configuration module
//!
//! Provides CLI argument parsing and validation for the pinglight binary.

use crate::monitor::command::PingCommand;
use crate::monitor::constants::DEFAULT_TARGET;
use crate::monitor::error::{MonitorError, Result};
use clap::Parser;
use std::time::Duration;
use tracing::debug;

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Parser, Debug, Clone)]
#[command(name = "pinglight")]
#[command(about = "Continuous latency status light driven by the system ping tool")]
pub struct MonitorConfig {
    /// Hostname or IP address to ping
    #[arg(long, default_value = DEFAULT_TARGET)]
    pub target: String,

    /// Ping executable to run instead of the platform `ping`
    #[arg(long)]
    pub program: Option<String>,

    /// Stop after this many seconds (0 runs until the ping process ends)
    #[arg(long, default_value_t = 0)]
    pub duration_secs: u64,

    /// Disable the live status line and only log events
    #[arg(long)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Log format (text or json)
    #[arg(long, default_value = "text", value_parser = ["text", "json"])]
    pub log_format: String,
}

impl MonitorConfig {
    /// Returns the run duration, or `None` to run until the monitor dies
    pub fn duration(&self) -> Option<Duration> {
        if self.duration_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.duration_secs))
        }
    }

    /// Returns the command line the monitor will launch
    pub fn command(&self) -> PingCommand {
        match &self.program {
            Some(program) => PingCommand::continuous_with_program(program, &self.target),
            None => PingCommand::continuous(&self.target),
        }
    }

    /// Returns true if JSON format logging is enabled
    pub fn is_json_format(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }

    /// Validates the configuration values
    pub fn validate(&self) -> Result<()> {
        debug!("Validating monitor configuration");

        let target = self.target.trim();
        if target.is_empty() {
            return Err(MonitorError::Config("target must not be empty".into()));
        }
        if target.starts_with('-') {
            return Err(MonitorError::Config(format!(
                "target must not start with '-': {}",
                target
            )));
        }

        if let Some(program) = &self.program {
            if program.trim().is_empty() {
                return Err(MonitorError::Config("program must not be empty".into()));
            }
        }

        if !VALID_LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(MonitorError::Config(format!(
                "log_level must be one of: {}",
                VALID_LOG_LEVELS.join(", ")
            )));
        }

        debug!("Monitor configuration validated successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MonitorConfig {
        MonitorConfig {
            target: "1.1.1.1".to_string(),
            program: None,
            duration_secs: 0,
            quiet: false,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }

    #[test]
    fn test_default_config_from_cli() {
        let config = MonitorConfig::parse_from(["pinglight"]);
        assert_eq!(config.target, DEFAULT_TARGET);
        assert_eq!(config.program, None);
        assert_eq!(config.duration(), None);
        assert!(!config.quiet);
        assert!(!config.is_json_format());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_overrides() {
        let config = MonitorConfig::parse_from([
            "pinglight",
            "--target",
            "9.9.9.9",
            "--duration-secs",
            "30",
            "--log-format",
            "json",
            "--quiet",
        ]);
        assert_eq!(config.target, "9.9.9.9");
        assert_eq!(config.duration(), Some(Duration::from_secs(30)));
        assert!(config.is_json_format());
        assert!(config.quiet);
    }

    #[test]
    fn test_empty_target_rejected() {
        let mut config = config();
        config.target = "   ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_flag_like_target_rejected() {
        let mut config = config();
        config.target = "-c1".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_program_rejected() {
        let mut config = config();
        config.program = Some(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = config();
        config.log_level = "verbose".to_string();
        assert!(config.validate().is_err());

        config.log_level = "DEBUG".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_program_override_keeps_target_last() {
        let mut config = config();
        config.program = Some("/usr/local/bin/ping".to_string());
        let command = config.command();
        assert_eq!(command.program(), "/usr/local/bin/ping");
        assert_eq!(command.args().last().map(String::as_str), Some("1.1.1.1"));
    }
}
