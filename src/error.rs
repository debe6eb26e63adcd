use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of a [`DecodeError`].
///
/// - `Io`     — the file could not be opened, or a read ran past end-of-file
/// - `Format` — the bytes were readable but do not describe a valid dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    Format,
}

/// Everything that can go wrong while decoding a dataset file.
///
/// No decoder ever substitutes an empty result for one of these; a failed
/// call returns `Err` and any items decoded so far are dropped.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("cannot open '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input truncated while reading {what} at byte {offset}: needed {needed} more byte(s)")]
    Truncated {
        what: &'static str,
        offset: u64,
        needed: usize,
    },

    #[error("read failed at byte {offset}: {source}")]
    Read {
        offset: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("magic number mismatch: expected {expected:#010x}, got {found:#010x}")]
    BadMagic { expected: u32, found: u32 },

    #[error("header field '{field}' must be greater than zero")]
    EmptyHeader { field: &'static str },

    #[error("image geometry {height}x{width} exceeds the supported image size")]
    Oversized { height: u64, width: u64 },

    #[error("image file declares {images} items but label file declares {labels}")]
    CountMismatch { images: usize, labels: usize },

    #[error("label at index {index}: class {class} is out of range for n_classes={n_classes}")]
    ClassOutOfRange {
        index: usize,
        class: u32,
        n_classes: usize,
    },

    #[error("invalid config: {0}")]
    Config(String),
}

impl DecodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::Open { .. }
            | DecodeError::Truncated { .. }
            | DecodeError::Read { .. } => ErrorKind::Io,
            DecodeError::BadMagic { .. }
            | DecodeError::EmptyHeader { .. }
            | DecodeError::Oversized { .. }
            | DecodeError::CountMismatch { .. }
            | DecodeError::ClassOutOfRange { .. }
            | DecodeError::Config(_) => ErrorKind::Format,
        }
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;
