//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `DpError` as one variant
//! where configuration problems can surface.

use thiserror::Error;

/// The top-level error type for `dp-core`.
#[derive(Debug, Error)]
pub enum DpError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `dp-*` crates.
pub type DpResult<T> = Result<T, DpError>;
