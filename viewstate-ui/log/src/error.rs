use std::io;

use thiserror::Error;

/// Errors emitted while forwarding text into a log surface.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("log stream lock poisoned")]
    Poisoned,

    #[error("log channel is full")]
    Full,

    #[error("log channel disconnected")]
    Disconnected,
}

impl From<LogError> for io::Error {
    fn from(err: LogError) -> Self {
        match err {
            LogError::Disconnected => {
                io::Error::new(io::ErrorKind::BrokenPipe, err)
            },
            LogError::Full => io::Error::new(io::ErrorKind::WouldBlock, err),
            LogError::Poisoned => io::Error::other(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, LogError>;
