//! Service errors. Each failure class stays distinguishable up to the command layer.

use dbot_core::DbotError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AiError {
    /// Operation invoked before `open()` or after `close()`.
    #[error("ai service is not open")]
    NotOpen,

    /// The mode's `clear` pattern does not compile. Reported on first use, not at config load.
    #[error("invalid clear pattern for {mode} mode: {source}")]
    InvalidPattern {
        mode: &'static str,
        #[source]
        source: regex::Error,
    },

    /// Transport failure, non-2xx status, or a response missing content/usage.
    #[error(transparent)]
    Completion(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AiError>;

impl From<AiError> for DbotError {
    fn from(e: AiError) -> Self {
        DbotError::Service(format!("{:#}", e))
    }
}
