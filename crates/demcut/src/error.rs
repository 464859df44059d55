//! Error types for demo parsing, extraction, and writing.

use std::io;

use thiserror::Error;

/// Errors that can occur while cutting a demo.
///
/// Every failure inside the parser, extractor, or writer surfaces as one of
/// these variants. A failed call never returns partial output.
#[derive(Debug, Error)]
pub enum CutError {
    /// The header magic or demo protocol is not one this build understands.
    #[error("unsupported demo format: {detail}")]
    UnsupportedFormat {
        /// What was found instead of a supported value.
        detail: String,
    },
    /// A read ran past the end of the input.
    #[error("truncated input at offset {offset}: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        /// Cursor position where the read started.
        offset: usize,
        /// Bytes the read required.
        needed: usize,
        /// Bytes that were actually left.
        remaining: usize,
    },
    /// A field holds a structurally impossible value.
    #[error("invalid encoding at offset {offset}: {detail}")]
    InvalidEncoding {
        /// Cursor position of the offending field.
        offset: usize,
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// The requested tick range is negative or reversed.
    #[error("invalid tick range {start}..={end}")]
    InvalidRange {
        /// Requested start tick.
        start: i64,
        /// Requested end tick.
        end: i64,
    },
    /// The output sink failed. Never produced when writing into memory.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CutError {
    /// Stable snake_case identifier of the error kind, for boundary layers
    /// that need to distinguish failures without matching on the enum.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat { .. } => "unsupported_format",
            Self::Truncated { .. } => "truncated",
            Self::InvalidEncoding { .. } => "invalid_encoding",
            Self::InvalidRange { .. } => "invalid_range",
            Self::Io(_) => "io",
        }
    }

    pub(crate) fn encoding(offset: usize, detail: impl Into<String>) -> Self {
        Self::InvalidEncoding {
            offset,
            detail: detail.into(),
        }
    }
}
