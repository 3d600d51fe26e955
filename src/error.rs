//! Error types
//!
//! Geometric queries never fail; everything here is a setup-time condition.

use thiserror::Error;

/// Actor/scene wiring failures
#[derive(Debug, Error)]
pub enum SceneError {
    /// An actor was created without a scene to own it
    #[error("{actor}: cannot attach without a scene")]
    MissingScene { actor: &'static str },
}

/// Asset lookup and loading failures
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("resource `{key}` has not been loaded")]
    NotLoaded { key: String },

    #[error("failed to load resource `{key}`: {reason}")]
    LoadFailed { key: String, reason: String },

    #[error("invalid asset manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// Settings file failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}
