//! Roundtrip command implementation.
//!
//! Compresses a file to `<file>.myz`, then restores it under a new name and
//! checks the result against the original.

use super::compress::compress;
use super::decompress::decompress;
use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};

pub fn cmd_roundtrip(file: &Path, output: Option<&Path>) -> Result<()> {
    let packed = compress(file, None)?;
    println!("File compressed successfully: {}", packed.container.display());

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| roundtrip_output_path(file));
    let unpacked = decompress(&packed.container, Some(&output), true)?;
    println!("File decompressed successfully: {}", unpacked.output.display());

    let original = fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let restored =
        fs::read(&output).with_context(|| format!("Failed to read {}", output.display()))?;
    if original != restored {
        bail!(
            "{} differs from {} after the round trip",
            output.display(),
            file.display()
        );
    }
    println!("Round trip verified ({} bytes)", original.len());

    Ok(())
}

/// `dir/example.txt` becomes `dir/example_decompressed.txt`.
pub fn roundtrip_output_path(source: &Path) -> PathBuf {
    let mut name = source.file_stem().map(|s| s.to_os_string()).unwrap_or_default();
    name.push("_decompressed");
    if let Some(ext) = source.extension() {
        name.push(".");
        name.push(ext);
    }
    source.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_output_path() {
        assert_eq!(
            roundtrip_output_path(Path::new("example.txt")),
            PathBuf::from("example_decompressed.txt")
        );
        assert_eq!(
            roundtrip_output_path(Path::new("data/archive.tar.gz")),
            PathBuf::from("data/archive.tar_decompressed.gz")
        );
        assert_eq!(
            roundtrip_output_path(Path::new("README")),
            PathBuf::from("README_decompressed")
        );
    }

    #[test]
    fn test_roundtrip_command() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("example.txt");
        fs::write(&source, "round and round ".repeat(64)).unwrap();

        cmd_roundtrip(&source, None).unwrap();

        assert!(dir.path().join("example.txt.myz").exists());
        assert_eq!(
            fs::read(dir.path().join("example_decompressed.txt")).unwrap(),
            fs::read(&source).unwrap()
        );

        // Running again replaces the earlier output.
        cmd_roundtrip(&source, None).unwrap();
    }

    #[test]
    fn test_roundtrip_missing_source_stops_early() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("missing.txt");

        let err = cmd_roundtrip(&source, None).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to compress"));
        assert!(!dir.path().join("missing_decompressed.txt").exists());
    }
}
