//! Error types for Arbor operations.
//!
//! This module provides the main error type [`ArborError`] which wraps
//! the error conditions that can occur while building and exporting a
//! diagram.

use std::io;

use thiserror::Error;

use arbor_core::spec::SpecError;

/// The main error type for Arbor operations.
///
/// Every variant is fatal: a render either fully succeeds or stops at the
/// first error, and no output file is left behind.
#[derive(Debug, Error)]
pub enum ArborError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A node lacks its `id` or `category`.
    #[error("malformed node at `{path}`: missing {missing}")]
    MalformedNode { path: String, missing: &'static str },

    /// An edge endpoint does not resolve to a registered node.
    #[error("{0}")]
    Unresolved(#[from] SpecError),

    /// A dataset document could not be deserialized.
    #[error("invalid dataset `{path}`: {message}")]
    Dataset { path: String, message: String },

    #[error("unknown layer `{0}`")]
    UnknownLayer(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<crate::export::Error> for ArborError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl ArborError {
    /// Create a `MalformedNode` error for the node at `path`.
    pub fn malformed_node(path: impl Into<String>, missing: &'static str) -> Self {
        Self::MalformedNode {
            path: path.into(),
            missing,
        }
    }
}
