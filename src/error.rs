// ⚠️ Error taxonomy
//
// Only ingestion-level failures are errors. Row-level coercion problems never
// surface here: they degrade to field defaults inside the builders.

use thiserror::Error;

/// Failure of one ingestion pass for one sheet.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The export endpoint answered with a non-success status.
    #[error("feed returned HTTP {status}: {reason}")]
    Status { status: u16, reason: String },

    /// The request never produced a response (DNS, TLS, connection reset...).
    #[error("feed transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A response arrived but its body could not be read as text.
    #[error("feed body unreadable: {0}")]
    Body(String),
}

impl FeedError {
    /// HTTP status carried by the error, if the endpoint answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            FeedError::Status { status, .. } => Some(*status),
            FeedError::Transport(err) => err.status().map(|s| s.as_u16()),
            FeedError::Body(_) => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Load(#[from] Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Load(Box::new(err))
    }
}
