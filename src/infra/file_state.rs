//! Flat-file `StateStore`: the last-posted id as the whole file contents.
use std::path::PathBuf;

use tokio::fs;
use tracing::debug;

use crate::ports::state::{StateError, StateStore};

pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "state".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait::async_trait]
impl StateStore for FileStateStore {
    async fn get_last_id(&self) -> Result<Option<String>, StateError> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => {
                let id = content.trim();
                Ok((!id.is_empty()).then(|| id.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No state file yet");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn set_last_id(&self, id: &str) -> Result<(), StateError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        // Write-then-rename so readers never observe a truncated id.
        let tmp = self.temp_path();
        fs::write(&tmp, id.as_bytes()).await?;
        fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), id, "Stored last-posted id");
        Ok(())
    }
}
