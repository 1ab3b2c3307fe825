use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use base::entities::OrderTimestamp;
use base::stores::cursor_store::CursorStore;

#[derive(Serialize, Deserialize, Debug)]
struct CursorFileJson {
    last_acknowledged_timestamp: Option<OrderTimestamp>,
}

/// Keeps the cursor in a small JSON file so that it survives restarts.
pub struct FileCursorStore {
    path: PathBuf,
}

impl FileCursorStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut file_name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        file_name.push(".tmp");

        self.path.with_file_name(file_name)
    }
}

impl CursorStore for FileCursorStore {
    fn get(&self) -> Result<Option<OrderTimestamp>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).context(format!(
                    "failed to read the cursor file {}",
                    self.path.display()
                ))
            }
        };

        let cursor: CursorFileJson = serde_json::from_str(&contents).context(format!(
            "the cursor file {} is corrupted",
            self.path.display()
        ))?;

        Ok(cursor.last_acknowledged_timestamp)
    }

    fn set(&mut self, timestamp: OrderTimestamp) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context(format!(
                "failed to create the cursor directory {}",
                parent.display()
            ))?;
        }

        let contents = serde_json::to_string(&CursorFileJson {
            last_acknowledged_timestamp: Some(timestamp),
        })?;

        let temp_path = self.temp_path();
        fs::write(&temp_path, contents).context(format!(
            "failed to write the cursor file {}",
            temp_path.display()
        ))?;
        fs::rename(&temp_path, &self.path).context(format!(
            "failed to replace the cursor file {}",
            self.path.display()
        ))?;

        Ok(())
    }
}
