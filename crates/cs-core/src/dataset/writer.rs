//! Per-(event, class) entropy record files.

use std::fs;
use std::path::{Path, PathBuf};

use cs_common::{EntropyRecord, Result};
use serde::Serialize;

/// `<output_dir>/<event>/<class>_entropy.json`
pub fn entropy_file_path(output_dir: &Path, event: &str, class: &str) -> PathBuf {
    output_dir.join(event).join(format!("{}_entropy.json", class))
}

/// Write `records` as a pretty-printed JSON array, creating parent directories.
pub fn write_entropy_records(
    output_dir: &Path,
    event: &str,
    class: &str,
    records: &[EntropyRecord],
) -> Result<PathBuf> {
    let path = entropy_file_path(output_dir, event, class);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut ser)?;
    buf.push(b'\n');

    fs::write(&path, buf)?;
    Ok(path)
}

pub fn read_entropy_records(path: &Path) -> Result<Vec<EntropyRecord>> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
