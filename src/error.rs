use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReplError {
    #[error("failed to start python interpreter '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("interpreter i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed interpreter message: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected interpreter response: {0}")]
    Protocol(String),

    #[error("python interpreter exited unexpectedly ({0})")]
    Exited(String),

    #[error("python interpreter is not running; restart the session")]
    NotRunning,
}

impl ReplError {
    /// The child can no longer be talked to; anything else left the
    /// line framing intact.
    pub fn is_transport(&self) -> bool {
        matches!(self, ReplError::Io(_) | ReplError::Exited(_))
    }
}

pub type Result<T> = std::result::Result<T, ReplError>;
