//! Info command implementation.

use anyhow::{Context, Result};
use myz_archive::{HEADER_SIZE, MyzHeader, open_container};
use serde::Serialize;
use std::path::Path;

/// Machine-readable view of a container header.
#[derive(Debug, Serialize)]
struct ContainerInfo {
    container: String,
    name: String,
    name_length: u32,
    original_size: u32,
    compressed_size: u32,
    header_size: usize,
    expected_file_size: u64,
    file_size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    ratio_percent: Option<f64>,
}

impl ContainerInfo {
    fn new(archive: &Path, name: String, header: &MyzHeader, file_size: u64) -> Self {
        Self {
            container: archive.display().to_string(),
            name,
            name_length: header.name_length,
            original_size: header.original_size,
            compressed_size: header.compressed_size,
            header_size: HEADER_SIZE,
            expected_file_size: header.container_len(),
            file_size,
            ratio_percent: header.ratio(),
        }
    }
}

pub fn cmd_info(archive: &Path, json: bool) -> Result<()> {
    let reader = open_container(archive)
        .with_context(|| format!("Failed to read container {}", archive.display()))?;
    let file_size = std::fs::metadata(archive)
        .with_context(|| format!("Failed to stat {}", archive.display()))?
        .len();

    let info = ContainerInfo::new(archive, reader.name().into_owned(), reader.header(), file_size);

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Container Information");
    println!("=====================");
    println!("File: {}", info.container);
    println!("Stored name: {}", info.name);
    println!();
    println!("Header:");
    println!("  Name length: {} bytes", info.name_length);
    println!("  Original size: {} bytes", info.original_size);
    println!("  Compressed size: {} bytes", info.compressed_size);
    if let Some(ratio) = info.ratio_percent {
        println!("  Compression ratio: {:.1}%", ratio);
    }
    println!("  Container size: {} bytes", info.file_size);

    if info.file_size != info.expected_file_size {
        println!();
        println!(
            "Warning: header describes {} bytes but the file has {}",
            info.expected_file_size, info.file_size
        );
    }

    Ok(())
}
