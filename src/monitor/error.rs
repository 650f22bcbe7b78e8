use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to start ping: {0}")]
    Launch(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Process error: {0}")]
    Process(String),

    #[error("Display error: {0}")]
    Display(String),
}

pub type Result<T> = std::result::Result<T, MonitorError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn test_io_errors_convert() {
        fn spawn_like() -> Result<()> {
            Err(std::io::Error::new(ErrorKind::WouldBlock, "no threads left"))?;
            Ok(())
        }

        let err = spawn_like().unwrap_err();
        assert!(matches!(err, MonitorError::Io(_)));
        assert_eq!(err.to_string(), "I/O error: no threads left");
    }
}
