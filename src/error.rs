// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types shared by the project codec and the shape exporters.

use std::path::PathBuf;
use thiserror::Error;

use crate::io::media::DecodeError;

/// Coarse classification of a [`ShapeError`], suitable for user-facing
/// messages and for tests that only care about the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Corrupt,
    DecodeFailure,
    IoFailure,
    InvalidGeometry,
    InvalidConfig,
}

/// Errors raised by load, save and export operations.
#[derive(Debug, Error)]
pub enum ShapeError {
    /// A project document or a referenced source image is absent.
    #[error("File '{}' does not exist", path.display())]
    NotFound { path: PathBuf },

    /// A project document or MPSH file could not be parsed.
    #[error("Failed to parse '{}': {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    /// The image collaborator could not decode a source image.
    #[error("Failed to decode image '{}': {source}", path.display())]
    DecodeFailure {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    /// A write or read could not complete.
    #[error("IO error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A shape with zero width or height was presented for export.
    #[error("Shape {shape} of container {container} has an empty area ({width}x{height})")]
    InvalidGeometry {
        container: usize,
        shape: usize,
        width: u16,
        height: u16,
    },

    /// Bit depth outside of 1..=8.
    #[error("Bit depth {0} is out of range (expected 1-8)")]
    InvalidBitDepth(u8),

    /// Export was requested for a container without attached pixel data.
    #[error("No pixel data attached for '{}'", image_file.display())]
    ImageNotLoaded { image_file: PathBuf },

    /// The output does not fit the 32-bit offsets of the MPSH format.
    #[error("Export exceeds the 4 GiB limit of the MPSH format")]
    Oversize,
}

impl ShapeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Corrupt {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// The taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Corrupt { .. } => ErrorKind::Corrupt,
            Self::DecodeFailure { .. } | Self::ImageNotLoaded { .. } => ErrorKind::DecodeFailure,
            Self::Io { .. } | Self::Oversize => ErrorKind::IoFailure,
            Self::InvalidGeometry { .. } => ErrorKind::InvalidGeometry,
            Self::InvalidBitDepth(_) => ErrorKind::InvalidConfig,
        }
    }
}

pub type Result<T, E = ShapeError> = std::result::Result<T, E>;
