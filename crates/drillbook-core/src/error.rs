//! Error types for catalog parsing and progress persistence.
//!
//! Both kinds are fatal to a run: a malformed catalog aborts before any quiz
//! starts, and an unreadable save file is never silently reset.

use std::path::PathBuf;

use thiserror::Error;

/// A data-integrity violation found while parsing a catalog.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A question was closed with a number of answers other than four.
    #[error("question {identifier} has {found} answers instead of 4: {text}")]
    WrongAnswerCount {
        identifier: u32,
        text: String,
        found: usize,
    },

    /// A picture marker or answer line appeared before any question header.
    #[error("line {line_number}: no open question for '{line}'")]
    NoOpenQuestion { line_number: usize, line: String },

    /// A continuation line appeared while no answer was being accumulated.
    #[error("line {line_number}: no open answer to continue with '{line}'")]
    NoOpenAnswer { line_number: usize, line: String },

    /// A question header appeared before any topic header.
    #[error("line {line_number}: question outside of any topic: '{line}'")]
    QuestionOutsideTopic { line_number: usize, line: String },

    /// A header number does not fit the identifier range.
    #[error("line {line_number}: number out of range in '{line}'")]
    InvalidNumber { line_number: usize, line: String },

    /// Two question headers carry the same identifier.
    #[error("line {line_number}: duplicate question identifier {identifier}")]
    DuplicateIdentifier { identifier: u32, line_number: usize },
}

impl ParseError {
    /// The 1-based catalog line the error refers to, if it refers to one.
    pub fn line_number(&self) -> Option<usize> {
        match self {
            ParseError::WrongAnswerCount { .. } => None,
            ParseError::NoOpenQuestion { line_number, .. }
            | ParseError::NoOpenAnswer { line_number, .. }
            | ParseError::QuestionOutsideTopic { line_number, .. }
            | ParseError::InvalidNumber { line_number, .. }
            | ParseError::DuplicateIdentifier { line_number, .. } => Some(*line_number),
        }
    }
}

/// Failures reading or writing the progress file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The save file exists but could not be read.
    #[error("failed to read progress file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The save file was read but its contents could not be decoded.
    #[error("progress file {} is corrupt: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    /// The save file could not be written.
    #[error("failed to write progress file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
