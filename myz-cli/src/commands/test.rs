//! Test command implementation.

use anyhow::{Context, Result};
use myz_archive::read_entry;
use std::path::Path;

pub fn cmd_test(archive: &Path) -> Result<()> {
    let entry = read_entry(archive)
        .with_context(|| format!("Integrity test failed for {}", archive.display()))?;

    println!(
        "OK: {} ({} bytes from {} compressed)",
        entry.name, entry.header.original_size, entry.header.compressed_size
    );
    Ok(())
}
