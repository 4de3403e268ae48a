// crates/langmap-core/src/loader/common_io.rs
use crate::error::{LangmapError, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

#[cfg(feature = "compact")]
use flate2::read::GzDecoder;

fn is_gzip(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"))
}

/// Opens a file, buffers it, and wraps it in a Gzip decoder when the path
/// ends in `.gz`. Returns a generic Reader so the caller doesn't care about
/// the compression.
pub fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| {
        LangmapError::NotFound(format!("Dataset not found at {}: {}", path.display(), e))
    })?;

    let reader = BufReader::new(file);

    if !is_gzip(path) {
        return Ok(Box::new(reader));
    }

    #[cfg(feature = "compact")]
    let decoded: Result<Box<dyn Read>> = Ok(Box::new(GzDecoder::new(reader)));
    #[cfg(not(feature = "compact"))]
    let decoded: Result<Box<dyn Read>> = Err(LangmapError::InvalidData(format!(
        "{} is gzipped but 'compact' is disabled",
        path.display()
    )));

    decoded
}

/// `true` for `http://` and `https://` locations.
pub fn is_remote(location: &str) -> bool {
    let lower = location.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
