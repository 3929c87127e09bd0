use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Created,
    Updated,
    Unchanged,
}

impl WriteStatus {
    pub fn changed(self) -> bool {
        self != WriteStatus::Unchanged
    }
}

/// Write `content` to `path` unless the file already holds exactly these bytes.
///
/// Parent directories are created as needed.
pub fn write_if_changed(path: &Path, content: &str) -> io::Result<WriteStatus> {
    let status = match fs::read(path) {
        Ok(existing) if existing == content.as_bytes() => {
            tracing::debug!(path = %path.display(), "Unchanged");
            return Ok(WriteStatus::Unchanged);
        }
        Ok(_) => WriteStatus::Updated,
        Err(e) if e.kind() == io::ErrorKind::NotFound => WriteStatus::Created,
        Err(e) => return Err(e),
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    tracing::debug!(path = %path.display(), ?status, "Wrote file");
    Ok(status)
}

/// Pretty-printed JSON with a trailing newline, written through [`write_if_changed`].
pub fn write_json_if_changed<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> crate::Result<WriteStatus> {
    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');
    Ok(write_if_changed(path, &content)?)
}
