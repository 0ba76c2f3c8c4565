//! Error taxonomy for the harness
//!
//! Setup failures (`Auth`, `Setup`) abort a run, every other kind is recorded
//! against the case that produced it.

use thiserror::Error;

/// An expectation mismatch raised by the response assertions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AssertionFailure {
    pub message: String,
}

impl AssertionFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum HarnessError {
    /// Identity endpoint rejected the credentials or returned no token
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Transport-level failure: DNS, connection refused, timeout, body read
    #[error("Network error calling {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Assertion failed: {0}")]
    Assertion(#[from] AssertionFailure),

    /// A case ran without the state an earlier case should have produced
    #[error("Precondition not met: {0}")]
    Precondition(String),

    /// Reference data could not be loaded during suite setup
    #[error("Suite setup failed: {0}")]
    Setup(String),

    /// A body could not be encoded or decoded as expected
    #[error("JSON error: {0}")]
    Json(String),
}

impl HarnessError {
    pub fn network(url: &str, source: reqwest::Error) -> Self {
        HarnessError::Network {
            url: url.to_string(),
            source,
        }
    }

    /// Short label used in run reports
    pub fn kind(&self) -> &'static str {
        match self {
            HarnessError::Auth(_) => "AuthError",
            HarnessError::Network { .. } => "NetworkError",
            HarnessError::Assertion(_) => "AssertionFailure",
            HarnessError::Precondition(_) => "PreconditionError",
            HarnessError::Setup(_) => "SetupError",
            HarnessError::Json(_) => "JsonError",
        }
    }
}

pub type Result<T> = std::result::Result<T, HarnessError>;
