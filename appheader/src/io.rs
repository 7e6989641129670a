//! Image source and sink abstractions.
//!
//! The signer itself works on in-memory buffers. These traits describe the
//! two capabilities it needs from the outside world: read a whole image and
//! write a whole image. Every [`Read`] is a source and every [`Write`] is a
//! sink.

use std::io::{Read, Result, Write};

/// Provides the raw image bytes.
pub trait ImageSource {
    /// Reads the entire image into memory.
    fn read_image(&mut self) -> Result<Vec<u8>>;
}

/// Persists a signed image.
pub trait ImageSink {
    /// Writes the entire image.
    ///
    /// Implementations must return an error instead of accepting a partial
    /// write.
    fn write_image(&mut self, image: &[u8]) -> Result<()>;
}

impl<R: Read + ?Sized> ImageSource for R {
    fn read_image(&mut self) -> Result<Vec<u8>> {
        let mut buff = Vec::new();
        self.read_to_end(&mut buff)?;
        Ok(buff)
    }
}

impl<W: Write + ?Sized> ImageSink for W {
    fn write_image(&mut self, image: &[u8]) -> Result<()> {
        self.write_all(image)?;
        self.flush()
    }
}
