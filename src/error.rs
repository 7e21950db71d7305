//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Upstream API error: {0}")]
    Upstream(String),

    #[error("{0}")]
    MissingInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Language model error: {0}")]
    Model(String),
}

impl Error {
    /// True when the request never reached the upstream, so sending it again
    /// cannot duplicate work on the other side.
    pub fn is_connect_failure(&self) -> bool {
        matches!(self, Error::Http(e) if e.is_connect())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
