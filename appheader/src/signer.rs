//! Image signing and bootloader-side verification.
//!
//! Signing writes two header fields: `size`, the number of bytes from the
//! vector table to the end of the image, and `crc32`, the CRC32 of exactly
//! those bytes. Every other byte is copied unchanged into a new buffer.

use byteorder::{ByteOrder, LittleEndian};

use crate::{
    crc::calculate_crc32,
    error::{ImageError, Result},
    header::AppHeader,
    io::{ImageSink, ImageSource},
    layout::{self, APP_MAX_SIZE, CRC_FIELD, PADDING_SIZE, SIZE_FIELD, VECTOR_TABLE_OFFSET},
};

/// Signs application images and checks them the way the bootloader does.
///
/// The signer holds no state between calls; `max_payload_size` is only
/// consulted by [`verify`](Self::verify).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSigner {
    max_payload_size: u32,
}

impl Default for ImageSigner {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageSigner {
    /// Creates a signer for the default 112 KiB application slot.
    pub const fn new() -> Self {
        Self {
            max_payload_size: APP_MAX_SIZE,
        }
    }

    /// Overrides the largest payload [`verify`](Self::verify) accepts.
    pub const fn with_max_payload_size(mut self, max: u32) -> Self {
        self.max_payload_size = max;
        self
    }

    /// Largest payload accepted by [`verify`](Self::verify).
    pub fn max_payload_size(&self) -> u32 {
        self.max_payload_size
    }

    /// Signs `raw`, returning a new buffer with `size` and `crc32` patched.
    ///
    /// `raw` is never modified. Signing an already signed image with the
    /// same payload gives identical bytes.
    ///
    /// # Errors
    ///
    /// - [`ImageError::ImageTooSmall`] if `raw` ends before the vector table.
    /// - [`ImageError::InvalidMagic`] if the header magic is wrong.
    pub fn sign(&self, raw: &[u8]) -> Result<SignedImage> {
        if raw.len() < VECTOR_TABLE_OFFSET {
            return Err(ImageError::too_small(raw.len(), VECTOR_TABLE_OFFSET));
        }

        let mut header = AppHeader::parse(raw)?;
        header.check_magic()?;

        let payload = layout::payload(raw)?;
        let size = u32::try_from(payload.len()).map_err(|_| ImageError::ImageTooLarge {
            size: payload.len(),
        })?;
        let crc32 = calculate_crc32(payload);

        debug!(
            "signing image: version {:#010X}, payload {size} bytes, crc32 {crc32:#010X}",
            header.version
        );

        let mut data = raw.to_vec();
        LittleEndian::write_u32(&mut data[SIZE_FIELD], size);
        LittleEndian::write_u32(&mut data[CRC_FIELD], crc32);

        header.size = size;
        header.crc32 = crc32;

        Ok(SignedImage { data, header })
    }

    /// Checks a signed image like the bootloader does before jumping to it.
    ///
    /// Only the `size` bytes following the vector table are checksummed;
    /// anything after them is ignored.
    ///
    /// # Errors
    ///
    /// Returns the first failed check: [`ImageError::ImageTooSmall`],
    /// [`ImageError::InvalidMagic`], [`ImageError::EmptyPayload`],
    /// [`ImageError::PayloadTooLarge`], [`ImageError::Truncated`] or
    /// [`ImageError::ChecksumMismatch`].
    pub fn verify(&self, image: &[u8]) -> Result<AppHeader> {
        if image.len() < VECTOR_TABLE_OFFSET {
            return Err(ImageError::too_small(image.len(), VECTOR_TABLE_OFFSET));
        }

        let header = AppHeader::parse(image)?;
        header.check_magic()?;

        if header.size == 0 {
            return Err(ImageError::EmptyPayload);
        }
        if header.size > self.max_payload_size {
            return Err(ImageError::PayloadTooLarge {
                size: header.size,
                max: self.max_payload_size,
            });
        }

        let available = image.len() - VECTOR_TABLE_OFFSET;
        let end = VECTOR_TABLE_OFFSET + header.size as usize;
        let payload = image.get(VECTOR_TABLE_OFFSET..end).ok_or(ImageError::Truncated {
            expected: header.size,
            available,
        })?;

        let actual = calculate_crc32(payload);
        trace!("verify: header crc32 {:#010X}, payload crc32 {actual:#010X}", header.crc32);
        if actual != header.crc32 {
            return Err(ImageError::ChecksumMismatch {
                expected: header.crc32,
                actual,
            });
        }

        Ok(header)
    }

    /// Reads the whole image from `source`, signs it and writes the result
    /// to `sink`.
    ///
    /// Nothing is written if signing fails.
    pub fn sign_stream<S, K>(&self, source: &mut S, sink: &mut K) -> Result<SignedImage>
    where
        S: ImageSource + ?Sized,
        K: ImageSink + ?Sized,
    {
        let raw = source.read_image()?;
        debug!("read {} bytes from image source", raw.len());

        let signed = self.sign(&raw)?;
        sink.write_image(signed.as_bytes())?;
        Ok(signed)
    }
}

/// A signed image together with its decoded header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedImage {
    data: Vec<u8>,
    header: AppHeader,
}

impl SignedImage {
    /// The header as written into the image.
    pub fn header(&self) -> &AppHeader {
        &self.header
    }

    /// The signed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the image, returning the signed bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Total image length.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false; a signed image holds at least a header and padding.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Payload length, as stored in the `size` field.
    pub fn payload_size(&self) -> u32 {
        self.header.size
    }

    /// Alignment filler between header and vector table.
    pub fn padding_size(&self) -> usize {
        PADDING_SIZE
    }

    /// Bytes from the vector table to the end.
    pub fn payload(&self) -> &[u8] {
        &self.data[VECTOR_TABLE_OFFSET..]
    }
}

impl AsRef<[u8]> for SignedImage {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{APP_HEADER_MAGIC, HEADER_SIZE};
    use std::io::Cursor;

    fn raw_image(payload: &[u8]) -> Vec<u8> {
        let mut raw = vec![0u8; VECTOR_TABLE_OFFSET];
        raw[..4].copy_from_slice(&APP_HEADER_MAGIC.to_le_bytes());
        raw[4..8].copy_from_slice(&0x0001_0000u32.to_le_bytes());
        raw.extend_from_slice(payload);
        raw
    }

    #[test]
    fn test_sign_patches_size_and_crc() {
        let raw = raw_image(&[0xAA, 0xBB, 0xCC, 0xDD]);
        let signed = ImageSigner::new().sign(&raw).unwrap();

        assert_eq!(signed.len(), 260);
        assert_eq!(&signed.as_bytes()[8..12], &[4, 0, 0, 0]);
        assert_eq!(&signed.as_bytes()[12..16], &0x55B401A7u32.to_le_bytes());
        assert_eq!(signed.header().size, 4);
        assert_eq!(signed.header().crc32, 0x55B401A7);
        assert_eq!(signed.header().version, 0x0001_0000);
    }

    #[test]
    fn test_sign_does_not_touch_input() {
        let raw = raw_image(&[1, 2, 3]);
        let copy = raw.clone();
        let _ = ImageSigner::new().sign(&raw).unwrap();
        assert_eq!(raw, copy);
    }

    #[test]
    fn test_sign_empty_payload() {
        let raw = raw_image(&[]);
        let signed = ImageSigner::new().sign(&raw).unwrap();
        assert_eq!(signed.payload_size(), 0);
        assert_eq!(signed.header().crc32, 0);
        assert!(signed.payload().is_empty());
    }

    #[test]
    fn test_sign_rejects_header_only_image() {
        let raw = raw_image(&[]);
        let err = ImageSigner::new().sign(&raw[..HEADER_SIZE]).unwrap_err();
        assert!(matches!(err, ImageError::ImageTooSmall { size: 32, min: 256 }));
    }

    #[test]
    fn test_sign_checks_length_before_magic() {
        let err = ImageSigner::new().sign(&[0u8; 8]).unwrap_err();
        assert!(matches!(err, ImageError::ImageTooSmall { .. }));
    }

    #[test]
    fn test_sign_rejects_bad_magic() {
        let mut raw = raw_image(&[1]);
        raw[..4].copy_from_slice(&[0xEF, 0xBE, 0xAD, 0xDF]);
        let err = ImageSigner::new().sign(&raw).unwrap_err();
        assert!(matches!(err, ImageError::InvalidMagic { found: 0xDFADBEEF }));
    }

    #[test]
    fn test_verify_signed_image() {
        let signer = ImageSigner::new();
        let signed = signer.sign(&raw_image(&[0x10; 64])).unwrap();
        let header = signer.verify(signed.as_bytes()).unwrap();
        assert_eq!(&header, signed.header());
    }

    #[test]
    fn test_verify_unsigned_image() {
        let err = ImageSigner::new().verify(&raw_image(&[0x10; 64])).unwrap_err();
        assert!(matches!(err, ImageError::EmptyPayload));
    }

    #[test]
    fn test_verify_detects_corruption() {
        let signer = ImageSigner::new();
        let mut data = signer.sign(&raw_image(&[0x10; 64])).unwrap().into_bytes();
        data[VECTOR_TABLE_OFFSET + 3] ^= 0x01;

        let err = signer.verify(&data).unwrap_err();
        assert!(matches!(err, ImageError::ChecksumMismatch { .. }));
    }

    #[test]
    fn test_verify_ignores_padding() {
        let signer = ImageSigner::new();
        let mut data = signer.sign(&raw_image(&[0x10; 64])).unwrap().into_bytes();
        data[HEADER_SIZE + 10] = 0xFF;
        assert!(signer.verify(&data).is_ok());
    }

    #[test]
    fn test_verify_truncated() {
        let signer = ImageSigner::new();
        let data = signer.sign(&raw_image(&[0x10; 64])).unwrap().into_bytes();

        let err = signer.verify(&data[..data.len() - 1]).unwrap_err();
        assert!(matches!(
            err,
            ImageError::Truncated {
                expected: 64,
                available: 63
            }
        ));
    }

    #[test]
    fn test_verify_trailing_bytes_ignored() {
        let signer = ImageSigner::new();
        let mut data = signer.sign(&raw_image(&[0x10; 64])).unwrap().into_bytes();
        data.extend_from_slice(&[0xFF; 16]);
        assert!(signer.verify(&data).is_ok());
    }

    #[test]
    fn test_verify_slot_limit() {
        let signer = ImageSigner::new().with_max_payload_size(32);
        let data = signer.sign(&raw_image(&[0x10; 64])).unwrap().into_bytes();

        let err = signer.verify(&data).unwrap_err();
        assert!(matches!(err, ImageError::PayloadTooLarge { size: 64, max: 32 }));
    }

    #[test]
    fn test_sign_stream() {
        let raw = raw_image(&[0xAA, 0xBB, 0xCC, 0xDD]);
        let mut source = Cursor::new(raw.clone());
        let mut sink = Vec::new();

        let signed = ImageSigner::new().sign_stream(&mut source, &mut sink).unwrap();
        assert_eq!(sink, signed.as_bytes());
        assert_eq!(sink.len(), raw.len());
    }

    #[test]
    fn test_sign_stream_writes_nothing_on_error() {
        let mut source = Cursor::new(vec![0u8; 300]);
        let mut sink = Vec::new();

        let err = ImageSigner::new()
            .sign_stream(&mut source, &mut sink)
            .unwrap_err();
        assert!(matches!(err, ImageError::InvalidMagic { found: 0 }));
        assert!(sink.is_empty());
    }
}
