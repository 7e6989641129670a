//! Typed view of the 32-byte application header.

use core::fmt;

use byteorder::{ByteOrder, LittleEndian};

use crate::{
    error::{ImageError, Result},
    layout::{
        APP_HEADER_MAGIC, CRC_FIELD, HEADER_SIZE, MAGIC_FIELD, RESERVED_FIELD, SIZE_FIELD,
        VERSION_FIELD, region,
    },
};

/// Application header as the bootloader sees it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AppHeader {
    /// Magic number, [`APP_HEADER_MAGIC`] for a valid image.
    pub magic: u32,
    /// Firmware version, e.g. `0x00010000` for 1.0.0.
    pub version: u32,
    /// Payload size in bytes, counted from the vector table.
    pub size: u32,
    /// CRC32 of the payload.
    pub crc32: u32,
    /// Reserved for future use.
    pub reserved: [u32; 4],
}

impl AppHeader {
    /// Decodes the header from the start of `bytes`.
    ///
    /// The magic is not checked, so foreign images can still be inspected.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::ImageTooSmall`] if `bytes` is shorter than
    /// [`HEADER_SIZE`].
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let header = region(bytes, 0..HEADER_SIZE)?;

        let mut reserved = [0u32; 4];
        LittleEndian::read_u32_into(&header[RESERVED_FIELD], &mut reserved);

        Ok(Self {
            magic: LittleEndian::read_u32(&header[MAGIC_FIELD]),
            version: LittleEndian::read_u32(&header[VERSION_FIELD]),
            size: LittleEndian::read_u32(&header[SIZE_FIELD]),
            crc32: LittleEndian::read_u32(&header[CRC_FIELD]),
            reserved,
        })
    }

    /// Encodes the header into the first [`HEADER_SIZE`] bytes of `buf`.
    pub fn write_to(&self, buf: &mut [u8]) -> Result<()> {
        let len = buf.len();
        let header = buf
            .get_mut(..HEADER_SIZE)
            .ok_or_else(|| ImageError::too_small(len, HEADER_SIZE))?;

        LittleEndian::write_u32(&mut header[MAGIC_FIELD], self.magic);
        LittleEndian::write_u32(&mut header[VERSION_FIELD], self.version);
        LittleEndian::write_u32(&mut header[SIZE_FIELD], self.size);
        LittleEndian::write_u32(&mut header[CRC_FIELD], self.crc32);
        LittleEndian::write_u32_into(&self.reserved, &mut header[RESERVED_FIELD]);
        Ok(())
    }

    /// Returns the encoded header.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        // The buffer is exactly one header long.
        let _ = self.write_to(&mut buf);
        buf
    }

    /// Whether the magic matches [`APP_HEADER_MAGIC`].
    pub fn has_valid_magic(&self) -> bool {
        self.magic == APP_HEADER_MAGIC
    }

    /// Fails with [`ImageError::InvalidMagic`] unless the magic is valid.
    pub fn check_magic(&self) -> Result<()> {
        if !self.has_valid_magic() {
            return Err(ImageError::InvalidMagic { found: self.magic });
        }
        Ok(())
    }

    /// Decodes the version word.
    pub fn firmware_version(&self) -> FirmwareVersion {
        FirmwareVersion::from(self.version)
    }
}

/// Firmware version packed as `0xMMMMmmpp`: major in the upper 16
/// bits, then minor and patch bytes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FirmwareVersion {
    pub major: u16,
    pub minor: u8,
    pub patch: u8,
}

impl From<u32> for FirmwareVersion {
    fn from(raw: u32) -> Self {
        Self {
            major: (raw >> 16) as u16,
            minor: (raw >> 8) as u8,
            patch: raw as u8,
        }
    }
}

impl From<FirmwareVersion> for u32 {
    fn from(v: FirmwareVersion) -> Self {
        ((v.major as u32) << 16) | ((v.minor as u32) << 8) | v.patch as u32
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
