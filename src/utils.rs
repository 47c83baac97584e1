use std::io::{self, Write};
use std::path::{Path, PathBuf};

use huffcodec::bits;
use tempfile::NamedTempFile;

const COMPRESSED_EXT: &str = "bin";
const SIDECAR_EXT: &str = "freq";
const DECOMPRESSED_SUFFIX: &str = "_decompressed.txt";

/// Write through a uniquely named temp file in the target directory and
/// rename it into place, so a failed write never leaves a truncated output
/// behind. The temp file is removed if anything fails before the rename.
pub fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(data)?;
    temp.persist(path)?;
    Ok(())
}

/// Packed stream size for a body of `body_bits`: header byte, body, padding.
/// `None` when it does not fit in `usize`.
pub fn packed_size(body_bits: u64) -> Option<usize> {
    let body = usize::try_from(body_bits).ok()?;
    let padded = body.checked_add(usize::from(bits::padding_for(body)))?;
    Some(1 + padded / 8)
}

/// `notes.txt` -> `notes.bin`
pub fn compressed_path(input: &Path) -> PathBuf {
    input.with_extension(COMPRESSED_EXT)
}

/// `notes.bin` -> `notes.freq`
pub fn sidecar_path(compressed: &Path) -> PathBuf {
    compressed.with_extension(SIDECAR_EXT)
}

/// `notes.bin` -> `notes_decompressed.txt`
pub fn decompressed_path(compressed: &Path) -> PathBuf {
    let stem = compressed
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    compressed.with_file_name(format!("{stem}{DECOMPRESSED_SUFFIX}"))
}

/// Format bytes into human-readable string (e.g. 1024 -> "1.00 KB")
pub fn format_bytes(bytes: usize) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", size, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;
    use std::thread;
    use tempfile::tempdir;

    #[test]
    fn test_output_paths() {
        let input = Path::new("docs/notes.txt");
        let bin = compressed_path(input);
        assert_eq!(bin, PathBuf::from("docs/notes.bin"));
        assert_eq!(sidecar_path(&bin), PathBuf::from("docs/notes.freq"));
        assert_eq!(
            decompressed_path(&bin),
            PathBuf::from("docs/notes_decompressed.txt")
        );
    }

    #[test]
    fn test_paths_without_extension() {
        assert_eq!(compressed_path(Path::new("README")), PathBuf::from("README.bin"));
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0.00 B");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn test_write_atomic_replaces_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.bin");
        write_atomic(&path, b"first").unwrap();
        write_atomic(&path, b"second").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"second");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_atomic_concurrent_writers() {
        let dir = tempdir().unwrap();
        let path = Arc::new(dir.path().join("out.bin"));

        let writers: Vec<_> = (0..8u8)
            .map(|i| {
                let path = Arc::clone(&path);
                thread::spawn(move || write_atomic(&path, &[i; 256]))
            })
            .collect();
        for writer in writers {
            writer.join().unwrap().unwrap();
        }

        // Whichever writer renamed last wins, whole.
        let data = fs::read(&*path).unwrap();
        assert_eq!(data.len(), 256);
        assert!(data.iter().all(|&b| b == data[0]));

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec!["out.bin"]);
    }

    #[test]
    fn test_packed_size() {
        // 19 body bits + 5 padding bits behind the header byte.
        assert_eq!(packed_size(19), Some(4));
        // A full byte of body still gets a full byte of padding.
        assert_eq!(packed_size(8), Some(3));
        assert_eq!(packed_size(1), Some(2));
        assert_eq!(packed_size(u64::MAX), None);
    }
}
