//! Durable storage for scan results.
//!
//! One handle per line, UTF-8, no header or trailer, so the file can be
//! fed straight into other tools. Writing happens once, at the end of a
//! run; a failure mid-write is fatal and the error reports how many handles
//! made it to disk before the failure.

use crate::error::HandleCheckError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write the available handles to `path`, creating or truncating the file.
///
/// Returns the number of handles written. The write order is the caller's
/// slice order (aggregation receipt order for a pipeline run).
///
/// # Errors
///
/// Returns `SinkError` naming the path if the file cannot be created, or if
/// any line fails to write or flush; the error carries the count written
/// before the failure so nothing is silently truncated.
pub fn write_results<P: AsRef<Path>>(
    path: P,
    handles: &[String],
) -> Result<usize, HandleCheckError> {
    let path = path.as_ref();
    let path_display = path.display().to_string();

    let file = File::create(path)
        .map_err(|e| HandleCheckError::sink(&path_display, format!("failed to create file: {}", e), 0))?;
    let mut writer = BufWriter::new(file);

    let mut written = 0usize;
    for handle in handles {
        writeln!(writer, "{}", handle).map_err(|e| {
            HandleCheckError::sink(&path_display, format!("failed to write line: {}", e), written)
        })?;
        written += 1;
    }

    writer
        .flush()
        .map_err(|e| HandleCheckError::sink(&path_display, format!("failed to flush: {}", e), written))?;

    tracing::debug!(path = %path_display, written, "results flushed to sink");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_writes_one_handle_per_line_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let handles = vec!["aaa".to_string(), "abc".to_string(), "zzz".to_string()];

        let written = write_results(&path, &handles).unwrap();
        assert_eq!(written, 3);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "aaa\nabc\nzzz\n");
    }

    #[test]
    fn test_empty_result_set_yields_existing_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");

        let written = write_results(&path, &[]).unwrap();
        assert_eq!(written, 0);
        assert!(path.exists());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_truncates_previous_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.txt");
        std::fs::write(&path, "stale\ncontent\n").unwrap();

        write_results(&path, &["fresh".to_string()]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "fresh\n");
    }

    #[test]
    fn test_unwritable_path_is_a_sink_error_naming_the_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing-subdir").join("out.txt");

        let err = write_results(&path, &["abc".to_string()]).unwrap_err();
        match &err {
            HandleCheckError::SinkError { path: p, written, .. } => {
                assert!(p.contains("missing-subdir"));
                assert_eq!(*written, 0);
            }
            other => panic!("expected SinkError, got {:?}", other),
        }
        assert!(err.to_string().contains("missing-subdir"));
    }
}
