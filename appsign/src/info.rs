//! `appsign info` - print the header of any image.

use std::path::Path;

use anyhow::Context;
use appheader::AppHeader;

use crate::{file, report};

pub fn run(image: &Path) -> anyhow::Result<()> {
    let data = file::read_image(image)?;
    let header = AppHeader::parse(&data)
        .with_context(|| format!("{} has no application header", image.display()))?;

    println!("{} ({} bytes)", image.display(), data.len());
    println!("{}", report::header_summary(&header));
    Ok(())
}
