pub mod local;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::core::StudioResult;

/// Destino de los archivos exportados
#[async_trait]
pub trait FileSink: Send + Sync {
    /// Guarda `bytes` como `file_name` y devuelve la ruta final
    async fn save(&self, file_name: &str, bytes: Vec<u8>) -> StudioResult<PathBuf>;
}

pub use local::LocalDirSink;
