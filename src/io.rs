//! File output for generated configs: one JSON document per seed index.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::{Result, StimError};

/// `<dir>/<index>.json`
pub fn config_path(dir: &Path, index: u64) -> PathBuf {
    dir.join(format!("{index}.json"))
}

/// Serialize `value` fully, then write it to `<dir>/<index>.json` via a
/// temporary file and rename, so a failed run never leaves partial JSON.
pub fn write_config<T: Serialize>(dir: &Path, index: u64, value: &T) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(value)?;

    std::fs::create_dir_all(dir).map_err(io_err(dir))?;
    let path = config_path(dir, index);
    let tmp = dir.join(format!(".{index}.json.tmp"));
    std::fs::write(&tmp, json).map_err(io_err(&tmp))?;
    std::fs::rename(&tmp, &path).map_err(io_err(&path))?;

    debug!(path = %path.display(), "config written");
    Ok(path)
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StimError {
    let path = path.to_path_buf();
    move |source| StimError::Io { path, source }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_keyed_by_index() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested");
        let path = write_config(&out, 7, &serde_json::json!({"a": 1})).unwrap();
        assert_eq!(path, out.join("7.json"));
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "{\n  \"a\": 1\n}");
        assert!(!out.join(".7.json.tmp").exists());
    }
}
