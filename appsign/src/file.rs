//! Image file access.
//!
//! Output is first written to a hidden sibling file and then renamed over the
//! destination, so a failed write never leaves a truncated image behind.

use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use anyhow::Context;
use appheader::{ImageSigner, SignedImage};

/// Reads a whole image file.
pub fn read_image(path: &Path) -> anyhow::Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("failed to read image file {}", path.display()))
}

/// Signs `input` into `output`.
///
/// On any error the destination is left untouched.
pub fn sign_file(signer: &ImageSigner, input: &Path, output: &Path) -> anyhow::Result<SignedImage> {
    let mut source =
        File::open(input).with_context(|| format!("failed to open input file {}", input.display()))?;

    let tmp = temp_path(output)?;
    debug!("writing to temporary file {}", tmp.display());

    let result = (|| -> anyhow::Result<SignedImage> {
        let mut sink = File::create(&tmp)
            .with_context(|| format!("failed to create {}", tmp.display()))?;
        let signed = signer
            .sign_stream(&mut source, &mut sink)
            .with_context(|| format!("failed to sign {}", input.display()))?;
        sink.sync_all()?;
        fs::rename(&tmp, output)
            .with_context(|| format!("failed to write output file {}", output.display()))?;
        Ok(signed)
    })();

    if result.is_err() && tmp.exists() {
        if let Err(e) = fs::remove_file(&tmp) {
            warn!("failed to remove {}: {e}", tmp.display());
        }
    }
    result
}

fn temp_path(path: &Path) -> anyhow::Result<PathBuf> {
    let name = path
        .file_name()
        .ok_or_else(|| anyhow!("invalid output path: {}", path.display()))?;
    Ok(path.with_file_name(format!(".{}.tmp", name.to_string_lossy())))
}
