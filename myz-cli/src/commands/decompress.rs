//! Decompress command implementation.

use anyhow::{Context, Result};
use myz_archive::{DecompressJob, UnpackReport};
use std::path::Path;

pub fn cmd_decompress(archive: &Path, output: Option<&Path>, force: bool) -> Result<()> {
    let report = decompress(archive, output, force)?;
    println!(
        "Decompressed {} -> {} ({} bytes)",
        report.container.display(),
        report.output.display(),
        report.header.original_size
    );
    Ok(())
}

pub(crate) fn decompress(
    archive: &Path,
    output: Option<&Path>,
    force: bool,
) -> Result<UnpackReport> {
    let mut job = DecompressJob::new(archive).overwrite(force);
    if let Some(output) = output {
        job = job.output(output);
    }

    job.run()
        .with_context(|| format!("Failed to decompress {}", archive.display()))
}
