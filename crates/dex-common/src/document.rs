//! JSON document persistence
//!
//! Output documents are pretty-printed UTF-8 JSON (non-ASCII names such as
//! "Flabébé" are written as-is, not escaped).

use crate::error::{DexError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Write a value as pretty-printed JSON, creating parent directories as needed
pub fn write_json_pretty<T: Serialize + ?Sized>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    debug!(path = %path.display(), "Wrote JSON document");
    Ok(())
}

/// Read a JSON document
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(DexError::DocumentNotFound(path.display().to_string()));
    }

    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
