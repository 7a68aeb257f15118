use std::path::{Path, PathBuf};
use std::process::Command;

use uuid::Uuid;

use crate::core::{StudioError, StudioResult};

/// Formato de salida de `typst compile`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypstFormat {
    Pdf,
    Png { ppi: f32 },
}

impl TypstFormat {
    fn extension(&self) -> &'static str {
        match self {
            TypstFormat::Pdf => "pdf",
            TypstFormat::Png { .. } => "png",
        }
    }
}

/// Compilador Typst por línea de comandos.
///
/// Cada compilación trabaja en un directorio temporal propio que se borra al terminar.
#[derive(Debug, Clone)]
pub struct TypstCompiler {
    bin: String,
    temp_dir: PathBuf,
}

impl TypstCompiler {
    pub fn new(bin: impl Into<String>, temp_dir: impl Into<PathBuf>) -> Self {
        TypstCompiler {
            bin: bin.into(),
            temp_dir: temp_dir.into(),
        }
    }

    /// Compila `source` y devuelve los bytes generados. `assets` se escriben
    /// junto al archivo `.typ` para que la fuente pueda referenciarlos por nombre.
    pub async fn compile(
        &self,
        source: &str,
        format: TypstFormat,
        assets: &[(&str, &[u8])],
    ) -> StudioResult<Vec<u8>> {
        let work_dir = self.temp_dir.join(format!("typst_{}", Uuid::new_v4()));
        tokio::fs::create_dir_all(&work_dir).await?;

        let result = self.compile_in(&work_dir, source, format, assets).await;

        if let Err(e) = tokio::fs::remove_dir_all(&work_dir).await {
            tracing::warn!("Failed to clean typst work dir {:?}: {}", work_dir, e);
        }

        result
    }

    async fn compile_in(
        &self,
        work_dir: &Path,
        source: &str,
        format: TypstFormat,
        assets: &[(&str, &[u8])],
    ) -> StudioResult<Vec<u8>> {
        let typ_path = work_dir.join("document.typ");
        let out_path = work_dir.join(format!("document.{}", format.extension()));

        // Escribir contenido Typst y recursos
        tokio::fs::write(&typ_path, source).await?;
        for (name, bytes) in assets {
            tokio::fs::write(work_dir.join(name), bytes).await?;
        }

        let mut command = Command::new(&self.bin);
        command.arg("compile").arg("--root").arg(work_dir);
        if let TypstFormat::Png { ppi } = format {
            command.arg("--format").arg("png").arg("--ppi").arg(ppi.to_string());
        }
        command.arg(&typ_path).arg(&out_path);

        // Compilar con Typst
        let output = tokio::task::spawn_blocking(move || command.output())
            .await
            .map_err(|e| StudioError::Capture(format!("Typst task failed: {}", e)))?
            .map_err(|e| StudioError::Capture(format!("Error ejecutando typst: {}", e)))?;

        if !output.status.success() {
            return Err(StudioError::Capture(format!(
                "Typst compilation failed: {}",
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        Ok(tokio::fs::read(&out_path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_a_capture_error() {
        let temp = tempfile::tempdir().unwrap();
        let compiler = TypstCompiler::new("typst-binary-that-does-not-exist", temp.path());

        let result = compiler.compile("= Hola", TypstFormat::Pdf, &[]).await;
        assert!(matches!(result, Err(StudioError::Capture(_))));

        // El directorio de trabajo se limpia aunque falle
        let leftovers = std::fs::read_dir(temp.path()).unwrap().count();
        assert_eq!(leftovers, 0);
    }
}
