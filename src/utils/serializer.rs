use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// Write `value` as pretty JSON to `path`, replacing the file
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .with_context(|| format!("Cannot open file {}", path.display()))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
