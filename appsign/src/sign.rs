//! `appsign sign` - patch size and CRC32 into an application image.

use std::path::Path;

use colored::Colorize;

use crate::{config::SignConfig, file, report};

pub fn run(config: &SignConfig, input: &Path, output: &Path, verify: bool) -> anyhow::Result<()> {
    let signer = config.signer(None);
    let signed = file::sign_file(&signer, input, output)?;

    println!("{}", report::sign_summary(input, output, &signed));

    if signed.payload_size() > signer.max_payload_size() {
        warn!(
            "firmware is {} bytes, larger than the {} byte application slot; the bootloader will reject it",
            signed.payload_size(),
            signer.max_payload_size()
        );
    }

    if verify || config.verify_after_sign {
        let written = file::read_image(output)?;
        if written != signed.as_bytes() {
            bail!("{} does not match the signed image", output.display());
        }
        signer.verify(&written)?;
        println!("{}", "Verification passed".green());
    }

    Ok(())
}
