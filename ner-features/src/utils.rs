use std::fs;
use std::path::Path;

use crate::errors::{NerError, Result};

/// Lê um arquivo de recurso (clusters, gazetteers) inteiro como texto.
pub(crate) fn read_resource<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|e| NerError::resource(path, e))
}

#[cfg(test)]
pub(crate) fn resource_file(contents: &str) -> tempfile::NamedTempFile {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
