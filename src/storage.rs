use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;

/// Destination for uploaded avatar bytes.
///
/// Files land under their original uploaded name; a same-named file silently
/// overwrites the previous one and old files are never deleted.
#[async_trait]
pub trait AvatarStore: Send + Sync {
    async fn save(&self, file_name: &str, body: Bytes) -> anyhow::Result<()>;
}

/// Writes avatars into a fixed directory on the local filesystem.
#[derive(Clone)]
pub struct LocalAvatarStore {
    dir: PathBuf,
}

impl LocalAvatarStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl AvatarStore for LocalAvatarStore {
    async fn save(&self, file_name: &str, body: Bytes) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("create upload dir {}", self.dir.display()))?;
        let path = self.dir.join(file_name);
        tokio::fs::write(&path, &body)
            .await
            .with_context(|| format!("write avatar {}", path.display()))?;
        Ok(())
    }
}
