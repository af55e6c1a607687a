//! Error types that can be emitted from this library

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent wrapper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent wrapper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// Transparent wrapper for [`serde_json::Error`]
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    /// A required manifest key is absent
    #[error("'{0}' missing from flat manifest")]
    MissingField(String),

    /// A table does not have the fixed shape required by its section
    #[error("wrong columns in '{table}' table: expected ({expected}), found ({found})")]
    SchemaMismatch {
        table: String,
        expected: String,
        found: String,
    },

    /// Serialized binary data is not a valid hex string
    #[error("invalid serialized binary data")]
    FormatError(#[from] hex::FromHexError),

    /// An embedded file could not be read
    #[error("reading '{}'", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Data is too large to describe with a 4 byte length
    #[error("{0} bytes do not fit in a 32 bit size field")]
    SizeOverflow(usize),

    /// The manifest source does not describe a well-typed manifest
    #[error("invalid manifest: {0}")]
    InvalidManifest(String),

    /// A row cell did not hold the requested type
    #[error("column {column} is not of type {expected}")]
    InvalidCell { column: usize, expected: &'static str },
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
