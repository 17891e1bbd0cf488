//! Crate-wide error type.

use std::io;

use crate::css::ParseError;
use crate::dom::NodeId;

/// Errors surfaced by the widget, its host and configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A style string (inline style, computed border width, thickness) failed to parse.
    #[error("style error: {0}")]
    Style(#[from] ParseError),

    /// Configuration could not be loaded.
    #[error("invalid options: {0}")]
    Options(String),

    /// A DOM handle the widget relies on is gone.
    #[error("node {0:?} is not in the DOM")]
    MissingNode(NodeId),

    /// An operation that needs the widget's DOM was called before mount.
    #[error("widget is not mounted")]
    NotMounted,

    /// Terminal I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Options(err.to_string())
    }
}

/// Result alias defaulting to [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
