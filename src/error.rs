use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CmsError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArg(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Remote API error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, CmsError>;
