//! Command line for the platform ping tool

use crate::monitor::constants::{PING_PROGRAM, WINDOWS_CONTINUOUS_FLAG};
use std::fmt;
use std::process::{Command, Stdio};

/// Program and arguments the monitor launches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingCommand {
    program: String,
    args: Vec<String>,
}

impl PingCommand {
    /// Platform ping in continuous mode against `target`
    pub fn continuous(target: &str) -> Self {
        Self::continuous_with_program(PING_PROGRAM, target)
    }

    /// Continuous-mode arguments for the host OS, with a custom executable
    pub fn continuous_with_program(program: &str, target: &str) -> Self {
        // Unix ping already runs until killed; Windows stops after four echo requests
        let mut args = Vec::with_capacity(2);
        if cfg!(windows) {
            args.push(WINDOWS_CONTINUOUS_FLAG.to_string());
        }
        args.push(target.to_string());
        Self {
            program: program.to_string(),
            args,
        }
    }

    /// Arbitrary program and arguments, used verbatim
    pub fn custom<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Last argument, which is the target for every continuous-mode command
    pub fn target(&self) -> Option<&str> {
        self.args.last().map(String::as_str)
    }

    /// Build a `Command` with stdin closed and both output streams piped
    pub(crate) fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        command
    }
}

impl fmt::Display for PingCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_continuous_targets_last() {
        let command = PingCommand::continuous("8.8.8.8");
        assert_eq!(command.program(), "ping");
        assert_eq!(command.target(), Some("8.8.8.8"));
    }

    #[cfg(windows)]
    #[test]
    fn test_windows_uses_forever_flag() {
        let command = PingCommand::continuous("8.8.8.8");
        assert_eq!(command.args(), ["-t", "8.8.8.8"]);
    }

    #[cfg(not(windows))]
    #[test]
    fn test_unix_has_no_count_flag() {
        let command = PingCommand::continuous("8.8.8.8");
        assert_eq!(command.args(), ["8.8.8.8"]);
    }

    #[test]
    fn test_custom_and_display() {
        let command = PingCommand::custom("sh", ["-c", "echo hi"]);
        assert_eq!(command.args(), ["-c", "echo hi"]);
        assert_eq!(command.to_string(), "sh -c echo hi");
        assert_eq!(command.target(), Some("echo hi"));
        assert_eq!(PingCommand::custom("ping", Vec::<String>::new()).target(), None);
    }
}
