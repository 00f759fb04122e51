//! crate‑wide error type
//!
//! Only construction can fail: bad world dimensions, a config file that
//! can't be read or parsed, or tunables outside their valid range. Nothing
//! in the per‑tick simulation returns an error.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MinerError {
    /// world extent can't hold a sealed, stratified playfield
    #[error("invalid world dimensions {width}x{height}: {reason}")]
    InvalidDimensions {
        width: usize,
        height: usize,
        reason: &'static str,
    },

    /// a tunable is outside its valid range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),
}
