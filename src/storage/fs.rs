//! Filesystem-backed `StoreClient`: one file per store path under a root directory.

use super::client::StoreClient;
use super::paths;
use crate::core::{Result, TopologyError};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{Level, event};
use uuid::Uuid;

pub struct FsClient {
    root: PathBuf,
    closed: AtomicBool,
}

impl FsClient {
    /// Opens (and creates if needed) a store rooted at `root`.
    pub async fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)
            .await
            .map_err(|err| TopologyError::IoError(format!("create store root: {}", err)))?;
        Ok(Self {
            root,
            closed: AtomicBool::new(false),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(TopologyError::ClientClosed);
        }
        Ok(())
    }

    /// Maps a store path onto the root. Hidden segments are reserved for staging files.
    fn local_path(&self, path: &str) -> Result<PathBuf> {
        let mut local = self.root.clone();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            if segment.starts_with('.') {
                return Err(TopologyError::StoreError(format!(
                    "invalid path segment '{}' in '{}'",
                    segment, path
                )));
            }
            local.push(segment);
        }
        Ok(local)
    }

    /// Writes `data` to a hidden sibling of `local` and returns the staged path.
    async fn write_staged(&self, local: &Path, data: &[u8]) -> Result<PathBuf> {
        let dir = local.parent().ok_or_else(|| {
            TopologyError::StoreError(format!("'{}' has no parent directory", local.display()))
        })?;
        fs::create_dir_all(dir).await?;

        let name = local
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("node");
        let staged = dir.join(format!(".{}.{}.tmp", name, Uuid::new_v4()));
        let mut file = fs::File::create(&staged).await?;
        file.write_all(data).await?;
        file.sync_data().await?;
        Ok(staged)
    }

    async fn discard_staged(&self, staged: &Path) {
        if let Err(err) = fs::remove_file(staged).await {
            event!(
                Level::WARN,
                path = %staged.display(),
                error = %err,
                "failed to remove staged store file"
            );
        }
    }
}

#[async_trait]
impl StoreClient for FsClient {
    async fn create(&self, path: &str, data: Vec<u8>) -> Result<()> {
        self.ensure_open()?;
        let local = self.local_path(path)?;
        let staged = self.write_staged(&local, &data).await?;

        // hard_link refuses an existing target, which makes create-if-absent atomic
        let linked = fs::hard_link(&staged, &local).await;
        self.discard_staged(&staged).await;
        match linked {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                Err(TopologyError::NodeExists(paths::clean(path)))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn update(&self, path: &str, data: Vec<u8>) -> Result<()> {
        self.ensure_open()?;
        let local = self.local_path(path)?;
        let staged = self.write_staged(&local, &data).await?;
        if let Err(err) = fs::rename(&staged, &local).await {
            self.discard_staged(&staged).await;
            return Err(err.into());
        }
        Ok(())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.ensure_open()?;
        let local = self.local_path(path)?;
        match fs::remove_file(&local).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    async fn read(&self, path: &str) -> Result<Option<Vec<u8>>> {
        self.ensure_open()?;
        let local = self.local_path(path)?;
        match fs::metadata(&local).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Ok(None),
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        }
        match fs::read(&local).await {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn list(&self, path: &str) -> Result<Vec<String>> {
        self.ensure_open()?;
        let dir = paths::clean(path);
        let local = self.local_path(&dir)?;
        match fs::metadata(&local).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Ok(Vec::new()),
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        }

        let mut entries = fs::read_dir(&local).await?;
        let mut listed = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            listed.push(paths::join(&dir, &name));
        }
        listed.sort();
        Ok(listed)
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
