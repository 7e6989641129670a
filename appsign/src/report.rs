//! Human-readable summaries.
//!
//! Everything printed here is derived from values returned by the signer.

use std::{fmt::Write, path::Path};

use appheader::{AppHeader, HEADER_SIZE, PADDING_SIZE, SignedImage};
use byte_unit::{Byte, UnitType};
use colored::Colorize;

const RULE: &str = "============================================================";

/// Formats a byte count with a binary unit, e.g. `1.50 KiB`.
pub fn human_size(bytes: u64) -> String {
    let adjusted = Byte::from_u64(bytes).get_appropriate_unit(UnitType::Binary);
    format!("{adjusted:.2}")
}

/// Summary printed after a successful `sign`.
pub fn sign_summary(input: &Path, output: &Path, signed: &SignedImage) -> String {
    let header = signed.header();
    let mut s = String::new();

    let _ = writeln!(s, "{RULE}");
    let _ = writeln!(s, "{}", "Application Binary Signing Complete".green().bold());
    let _ = writeln!(s, "{RULE}");
    let _ = writeln!(s, "Input file:       {}", input.display());
    let _ = writeln!(s, "Output file:      {}", output.display());
    let _ = writeln!(
        s,
        "Total size:       {} bytes ({})",
        signed.len(),
        human_size(signed.len() as u64)
    );
    let _ = writeln!(s, "Header size:      {HEADER_SIZE} bytes");
    let _ = writeln!(s, "Padding size:     {PADDING_SIZE} bytes");
    let _ = writeln!(
        s,
        "Firmware size:    {} bytes ({})",
        header.size,
        human_size(header.size as u64)
    );
    write_ids(&mut s, header);
    let _ = writeln!(s, "CRC32:            {:#010X}", header.crc32);
    let _ = write!(s, "{RULE}");
    s
}

/// Field-by-field dump of a header.
pub fn header_summary(header: &AppHeader) -> String {
    let mut s = String::new();

    write_ids(&mut s, header);
    if !header.has_valid_magic() {
        let _ = writeln!(s, "                  {}", "(not an application image)".red());
    }
    let _ = writeln!(
        s,
        "Firmware size:    {} bytes ({})",
        header.size,
        human_size(header.size as u64)
    );
    let _ = writeln!(s, "CRC32:            {:#010X}", header.crc32);
    let reserved = header
        .reserved
        .iter()
        .map(|w| format!("{w:#010X}"))
        .collect::<Vec<_>>()
        .join(" ");
    let _ = write!(s, "Reserved:         {reserved}");
    s
}

fn write_ids(s: &mut String, header: &AppHeader) {
    let _ = writeln!(s, "Magic:            {:#010X}", header.magic);
    let _ = writeln!(
        s,
        "Version:          {:#010X} ({})",
        header.version,
        header.firmware_version()
    );
}
