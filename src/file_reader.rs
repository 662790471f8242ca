use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use memmap2::Mmap;

use crate::error::OutlineError;

pub const MMAP_THRESHOLD: u64 = 64 * 1024;
pub const BINARY_CHECK_SIZE: usize = 8192;

/// Read a document snapshot. `Ok(None)` means the file looks binary.
///
/// Bytes that are not UTF-8 (CANoe often saves Windows-1252) are replaced
/// rather than rejected; only identifiers and keywords matter to the scan.
pub fn read_document(path: &Path) -> Result<Option<String>, OutlineError> {
    let metadata = std::fs::metadata(path).map_err(|e| OutlineError::io(path, e))?;
    if metadata.len() == 0 {
        return Ok(Some(String::new()));
    }
    if metadata.len() >= MMAP_THRESHOLD {
        read_mmap(path)
    } else {
        read_buffered(path)
    }
}

fn read_mmap(path: &Path) -> Result<Option<String>, OutlineError> {
    let file = File::open(path).map_err(|e| OutlineError::io(path, e))?;
    // SAFETY: the map is read once and copied out before it is dropped.
    let mmap = unsafe { Mmap::map(&file) }.map_err(|e| OutlineError::io(path, e))?;
    let data = &mmap[..];
    if is_binary(data) {
        return Ok(None);
    }
    Ok(Some(decode(path, data)))
}

fn read_buffered(path: &Path) -> Result<Option<String>, OutlineError> {
    let file = File::open(path).map_err(|e| OutlineError::io(path, e))?;
    let mut reader = BufReader::with_capacity(64 * 1024, file);
    let mut check_buf = [0u8; BINARY_CHECK_SIZE];
    let n = reader.read(&mut check_buf).map_err(|e| OutlineError::io(path, e))?;
    if is_binary(&check_buf[..n]) {
        return Ok(None);
    }
    let mut all = Vec::from(&check_buf[..n]);
    reader.read_to_end(&mut all).map_err(|e| OutlineError::io(path, e))?;
    Ok(Some(decode(path, &all)))
}

fn decode(path: &Path, data: &[u8]) -> String {
    match String::from_utf8_lossy(data) {
        Cow::Borrowed(s) => s.to_owned(),
        Cow::Owned(s) => {
            tracing::debug!("{} is not valid UTF-8, decoded lossily", path.display());
            s
        }
    }
}

pub fn is_binary(data: &[u8]) -> bool {
    let check_len = data.len().min(BINARY_CHECK_SIZE);
    data[..check_len].contains(&0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn binary_detects_null_bytes() {
        assert!(is_binary(&[0x48, 0x65, 0x00, 0x6c]));
    }

    #[test]
    fn binary_clean_text() {
        assert!(!is_binary(b"testcase tc() {"));
    }

    #[test]
    fn reads_small_document() {
        let mut file = tempfile::Builder::new().suffix(".can").tempfile().unwrap();
        write!(file, "void f() {{\n}}\n").unwrap();
        let text = read_document(file.path()).unwrap().unwrap();
        assert_eq!(text, "void f() {\n}\n");
    }

    #[test]
    fn reads_large_document_through_mmap() {
        let mut file = tempfile::Builder::new().suffix(".can").tempfile().unwrap();
        let line = "int counter(int step) {\n  return step;\n}\n";
        let repeats = (MMAP_THRESHOLD as usize / line.len()) + 1;
        for _ in 0..repeats {
            file.write_all(line.as_bytes()).unwrap();
        }
        let text = read_document(file.path()).unwrap().unwrap();
        assert_eq!(text.len(), line.len() * repeats);
    }

    #[test]
    fn empty_document_is_empty_text() {
        let file = tempfile::Builder::new().suffix(".cin").tempfile().unwrap();
        assert_eq!(read_document(file.path()).unwrap(), Some(String::new()));
    }

    #[test]
    fn binary_document_is_skipped() {
        let mut file = tempfile::Builder::new().suffix(".can").tempfile().unwrap();
        file.write_all(&[0x76, 0x00, 0x01, 0x02]).unwrap();
        assert_eq!(read_document(file.path()).unwrap(), None);
    }

    #[test]
    fn latin1_bytes_are_replaced() {
        let mut file = tempfile::Builder::new().suffix(".can").tempfile().unwrap();
        file.write_all(b"// Gr\xf6\xdfe\nvoid f() {").unwrap();
        let text = read_document(file.path()).unwrap().unwrap();
        assert!(text.contains("void f() {"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = read_document(Path::new("/definitely/not/here.can")).unwrap_err();
        assert!(matches!(err, OutlineError::Io { .. }));
    }
}
