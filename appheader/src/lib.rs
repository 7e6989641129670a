//! # appheader - application image signing
//!
//! A Rust library for patching bootloader application images with the
//! payload size and CRC32 that the bootloader checks before jumping to the
//! application.
//!
//! ## Image layout
//!
//! ```text
//! 0x000  magic     u32  0xDEADBEEF
//! 0x004  version   u32  passed through
//! 0x008  size      u32  written by the signer
//! 0x00C  crc32     u32  written by the signer
//! 0x010  reserved  16 bytes
//! 0x020  padding   224 bytes, not checksummed
//! 0x100  payload   vector table + code, checksummed
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use appheader::{ImageSigner, APP_HEADER_MAGIC, VECTOR_TABLE_OFFSET};
//!
//! let mut raw = vec![0u8; VECTOR_TABLE_OFFSET];
//! raw[..4].copy_from_slice(&APP_HEADER_MAGIC.to_le_bytes());
//! raw.extend_from_slice(&[0xAA, 0xBB, 0xCC, 0xDD]);
//!
//! let signer = ImageSigner::new();
//! let signed = signer.sign(&raw).unwrap();
//! assert_eq!(signed.header().size, 4);
//! assert!(signer.verify(signed.as_bytes()).is_ok());
//! ```
//!
//! ## Modules
//!
//! - [`layout`] - Fixed offsets and bounds-checked region access
//! - [`header`] - Typed view of the 32-byte application header
//! - [`crc`] - CRC32 checksum calculation
//! - [`signer`] - Signing and bootloader-side verification
//! - [`io`] - Image source and sink abstractions
//! - [`error`] - Error types and result definitions

#[macro_use]
extern crate log;

/// CRC32 checksum calculation utilities.
pub mod crc;

/// Error types and result definitions for image operations.
pub mod error;

/// Typed application header.
pub mod header;

/// Image source and sink abstractions.
pub mod io;

/// Fixed image layout.
pub mod layout;

/// Image signing and verification.
pub mod signer;

pub use self::crc::{Crc32, calculate_crc32};
pub use error::{ImageError, Result};
pub use header::{AppHeader, FirmwareVersion};
pub use io::{ImageSink, ImageSource};
pub use layout::{APP_HEADER_MAGIC, APP_MAX_SIZE, HEADER_SIZE, PADDING_SIZE, VECTOR_TABLE_OFFSET};
pub use signer::{ImageSigner, SignedImage};

/// Current version of the appheader implementation
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
