//! CRC32 checksum calculation.
//!
//! Uses the IEEE 802.3 polynomial in reflected form (0xEDB88320) with initial
//! value and final XOR of 0xFFFFFFFF, the same table-driven algorithm the
//! bootloader runs over the payload.

use ::crc::{CRC_32_ISO_HDLC, Crc, Digest};

static CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Calculates the CRC32 of `data` in one pass.
///
/// # Example
///
/// ```rust
/// assert_eq!(appheader::calculate_crc32(b"123456789"), 0xCBF43926);
/// ```
pub fn calculate_crc32(data: &[u8]) -> u32 {
    CRC32.checksum(data)
}

/// Incremental CRC32 hasher.
///
/// Feeding the data in several [`update`](Self::update) calls gives the same
/// result as [`calculate_crc32`] over the concatenation.
pub struct Crc32 {
    digest: Digest<'static, u32>,
}

impl Crc32 {
    /// Starts a new checksum.
    pub fn new() -> Self {
        Self {
            digest: CRC32.digest(),
        }
    }

    /// Feeds more bytes into the checksum.
    pub fn update(&mut self, data: &[u8]) {
        self.digest.update(data);
    }

    /// Finishes the checksum and returns the value.
    pub fn finalize(self) -> u32 {
        self.digest.finalize()
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}
