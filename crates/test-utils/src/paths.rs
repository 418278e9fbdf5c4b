//! Temporary input files for tests.

use std::io::Write;

use tempfile::NamedTempFile;

/// Writes `contents` to a temporary file with the given suffix.
///
/// The file is removed when the returned handle is dropped.
///
/// # Panics
///
/// Panics if the temporary file cannot be created or written; this is only
/// meant for tests.
pub fn temp_file_with(contents: &str, suffix: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temp file");
    file.flush().expect("Failed to flush temp file");
    file
}
