//! Fixed application image layout.
//!
//! ARM Cortex-M0+ needs the vector table on a 256-byte boundary, so the
//! 32-byte header is followed by 224 bytes of padding and the payload starts
//! at [`VECTOR_TABLE_OFFSET`]. All multi-byte fields are little-endian.

use core::ops::Range;

use crate::error::{ImageError, Result};

/// Magic number at the start of every application image.
pub const APP_HEADER_MAGIC: u32 = 0xDEADBEEF;

/// Size of the application header in bytes.
pub const HEADER_SIZE: usize = 32;

/// Offset of the vector table, which is also the start of the payload.
pub const VECTOR_TABLE_OFFSET: usize = 0x100;

/// Alignment filler between the header and the vector table.
pub const PADDING_SIZE: usize = VECTOR_TABLE_OFFSET - HEADER_SIZE;

/// Size of the bootloader's application slot (112 KiB).
pub const APP_MAX_SIZE: u32 = 112 * 1024;

/// `magic` field.
pub const MAGIC_FIELD: Range<usize> = 0..4;
/// `version` field.
pub const VERSION_FIELD: Range<usize> = 4..8;
/// `size` field, written by the signer.
pub const SIZE_FIELD: Range<usize> = 8..12;
/// `crc32` field, written by the signer.
pub const CRC_FIELD: Range<usize> = 12..16;
/// `reserved` words.
pub const RESERVED_FIELD: Range<usize> = 16..HEADER_SIZE;

/// Returns `image[range]`, or [`ImageError::ImageTooSmall`] when the image
/// ends before `range.end`.
pub fn region(image: &[u8], range: Range<usize>) -> Result<&[u8]> {
    let min = range.end;
    image
        .get(range)
        .ok_or_else(|| ImageError::too_small(image.len(), min))
}

/// Returns the payload, everything from the vector table to the end.
pub fn payload(image: &[u8]) -> Result<&[u8]> {
    region(image, VECTOR_TABLE_OFFSET..image.len().max(VECTOR_TABLE_OFFSET))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_cover_header() {
        assert_eq!(MAGIC_FIELD.end, VERSION_FIELD.start);
        assert_eq!(VERSION_FIELD.end, SIZE_FIELD.start);
        assert_eq!(SIZE_FIELD.end, CRC_FIELD.start);
        assert_eq!(CRC_FIELD.end, RESERVED_FIELD.start);
        assert_eq!(RESERVED_FIELD.end, HEADER_SIZE);
        assert_eq!(PADDING_SIZE, 224);
    }

    #[test]
    fn test_region_out_of_bounds() {
        let image = [0u8; 10];
        let err = region(&image, SIZE_FIELD).unwrap_err();
        assert!(matches!(err, ImageError::ImageTooSmall { size: 10, min: 12 }));
    }

    #[test]
    fn test_payload() {
        let mut image = vec![0u8; VECTOR_TABLE_OFFSET];
        assert!(payload(&image).unwrap().is_empty());

        image.extend_from_slice(&[1, 2, 3]);
        assert_eq!(payload(&image).unwrap(), &[1, 2, 3]);

        let err = payload(&image[..100]).unwrap_err();
        assert!(matches!(err, ImageError::ImageTooSmall { size: 100, min: 256 }));
    }
}
