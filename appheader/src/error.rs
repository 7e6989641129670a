//! Error types for image signing and verification.

use thiserror::Error;

use crate::layout::APP_HEADER_MAGIC;

/// Result type used throughout the crate.
pub type Result<T> = core::result::Result<T, ImageError>;

/// Errors produced while signing, verifying or transferring an image.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The buffer is shorter than the region being accessed.
    #[error("image too small ({size} bytes, need at least {min})")]
    ImageTooSmall { size: usize, min: usize },

    /// The first word of the header is not the application magic.
    #[error("invalid magic number {found:#010X} (expected {:#010X})", APP_HEADER_MAGIC)]
    InvalidMagic { found: u32 },

    /// The payload length does not fit the 32-bit size field.
    #[error("image too large: payload of {size} bytes does not fit the size field")]
    ImageTooLarge { size: usize },

    /// The header declares a zero-length payload.
    #[error("header declares an empty payload")]
    EmptyPayload,

    /// The header declares more payload than the application slot holds.
    #[error("payload size {size} exceeds the application slot ({max} bytes)")]
    PayloadTooLarge { size: u32, max: u32 },

    /// The header declares more payload than the image contains.
    #[error("image truncated: header declares {expected} payload bytes, only {available} present")]
    Truncated { expected: u32, available: usize },

    /// The payload CRC does not match the header.
    #[error("checksum mismatch: header says {expected:#010X}, payload is {actual:#010X}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    /// Reading the source or writing the sink failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ImageError {
    /// Creates an [`ImageError::ImageTooSmall`] for a buffer of `size` bytes.
    pub fn too_small(size: usize, min: usize) -> Self {
        Self::ImageTooSmall { size, min }
    }
}
