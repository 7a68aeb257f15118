use std::path::PathBuf;

use async_trait::async_trait;

use crate::core::StudioResult;

use super::FileSink;

/// Guarda las descargas en un directorio local, creándolo si hace falta.
/// Un archivo con el mismo nombre se sobrescribe.
#[derive(Debug, Clone)]
pub struct LocalDirSink {
    dir: PathBuf,
}

impl LocalDirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        LocalDirSink { dir: dir.into() }
    }
}

#[async_trait]
impl FileSink for LocalDirSink {
    async fn save(&self, file_name: &str, bytes: Vec<u8>) -> StudioResult<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.dir.join(file_name);
        let size = bytes.len();
        tokio::fs::write(&path, bytes).await?;

        tracing::info!("Saved {} ({} bytes)", path.display(), size);
        Ok(path)
    }
}
