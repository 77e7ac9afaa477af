use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for sprite compilation
#[derive(Error, Diagnostic, Debug)]
pub enum SpriteError {
    #[error("Configuration error: {message}")]
    #[diagnostic(code(lazysprite::config))]
    Configuration {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Directory not found: {}", .path.display())]
    #[diagnostic(code(lazysprite::missing))]
    ResourceNotFound {
        path: PathBuf,
        #[help]
        help: Option<String>,
    },

    #[error("Packing error: {message}")]
    #[diagnostic(code(lazysprite::pack))]
    Packing {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("{}: `{ratio}x` image should have dimensions divisible by {ratio}", .path.display())]
    #[diagnostic(
        code(lazysprite::dimension),
        help("Resize the source image so both sides are a multiple of the retina ratio")
    )]
    DimensionConstraint { path: PathBuf, ratio: u32 },

    #[error("IO error with {}: {message}", .path.display())]
    #[diagnostic(code(lazysprite::io))]
    Io { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    #[diagnostic(code(lazysprite::io))]
    IoError(#[from] std::io::Error),
}

impl SpriteError {
    /// Shorthand for a configuration error with help text.
    pub fn config(message: impl Into<String>, help: impl Into<String>) -> Self {
        SpriteError::Configuration {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Shorthand for a packing error without help text.
    pub fn packing(message: impl Into<String>) -> Self {
        SpriteError::Packing {
            message: message.into(),
            help: None,
        }
    }

    /// Wrap an IO failure together with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, context: &str, err: impl std::fmt::Display) -> Self {
        SpriteError::Io {
            path: path.into(),
            message: format!("{}: {}", context, err),
        }
    }
}

pub type Result<T> = std::result::Result<T, SpriteError>;
