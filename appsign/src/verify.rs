//! `appsign verify` - run the bootloader's checks on a signed image.

use std::path::Path;

use anyhow::Context;
use colored::Colorize;

use crate::{config::SignConfig, file, report};

pub fn run(config: &SignConfig, image: &Path, max_size: Option<u32>) -> anyhow::Result<()> {
    let signer = config.signer(max_size);
    let data = file::read_image(image)?;
    debug!(
        "verifying {} ({} bytes, slot {} bytes)",
        image.display(),
        data.len(),
        signer.max_payload_size()
    );

    match signer.verify(&data) {
        Ok(header) => {
            println!("{}", report::header_summary(&header));
            println!("{} {}", image.display(), "OK".green().bold());
            Ok(())
        }
        Err(e) => {
            println!("{} {}", image.display(), "FAIL".red().bold());
            Err(e).with_context(|| format!("{} failed verification", image.display()))
        }
    }
}
