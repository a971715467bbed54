//! Compress command implementation.

use anyhow::{Context, Result};
use myz_archive::{CompressJob, PackReport};
use std::path::Path;

pub fn cmd_compress(file: &Path, output: Option<&Path>) -> Result<()> {
    let report = compress(file, output)?;
    print_report(&report);
    Ok(())
}

pub(crate) fn compress(file: &Path, output: Option<&Path>) -> Result<PackReport> {
    let mut job = CompressJob::new(file);
    if let Some(output) = output {
        job = job.output(output);
    }

    job.run()
        .with_context(|| format!("Failed to compress {}", file.display()))
}

fn print_report(report: &PackReport) {
    println!(
        "Compressed {} -> {}",
        report.source.display(),
        report.container.display()
    );
    print!(
        "  {} -> {} bytes",
        report.header.original_size, report.header.compressed_size
    );
    match report.header.ratio() {
        Some(ratio) => println!(" ({:.1}%)", ratio),
        None => println!(),
    }
}
