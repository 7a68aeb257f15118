use std::io::Cursor;
use std::sync::Arc;
use std::time::Instant;

use image::{DynamicImage, ImageOutputFormat, RgbaImage};

use crate::core::{PageConfig, StudioConfig, StudioError, StudioResult};
use crate::generators::{fit_to_page, PageWriter, RegionCapture, TypstCapture, TypstCompiler, TypstPageWriter};
use crate::metrics;
use crate::models::{ExportKind, ExportOutcome};
use crate::preview::{PreviewSurface, PREVIEW_ELEMENT_ID};
use crate::storage::{FileSink, LocalDirSink};

/// Exporta la región de vista previa como PNG o como PDF de una página.
///
/// Los fallos se registran y se descartan: el resultado es `Skipped`.
pub struct ExportAdapter {
    capture: Arc<dyn RegionCapture>,
    writer: Arc<dyn PageWriter>,
    sink: Arc<dyn FileSink>,
    scale: f32,
    page: PageConfig,
}

impl ExportAdapter {
    pub fn new(
        capture: Arc<dyn RegionCapture>,
        writer: Arc<dyn PageWriter>,
        sink: Arc<dyn FileSink>,
        scale: f32,
        page: PageConfig,
    ) -> Self {
        ExportAdapter {
            capture,
            writer,
            sink,
            scale,
            page,
        }
    }

    /// Colaboradores de producción: Typst para capturar y paginar, directorio local para guardar
    pub fn from_config(config: &StudioConfig) -> Self {
        let compiler = TypstCompiler::new(config.typst_bin.clone(), config.temp_dir.clone());
        Self::new(
            Arc::new(TypstCapture::new(compiler.clone())),
            Arc::new(TypstPageWriter::new(compiler)),
            Arc::new(LocalDirSink::new(config.output_dir.clone())),
            config.capture_scale,
            config.page,
        )
    }

    pub async fn export(&self, kind: ExportKind, surface: &PreviewSurface, invoice_number: &str) -> ExportOutcome {
        let started = Instant::now();
        let result = self.try_export(kind, surface, invoice_number).await;
        metrics::observe_duration(kind, started.elapsed().as_secs_f64());

        match result {
            Ok(path) => {
                metrics::record_export(kind, "saved");
                tracing::info!(kind = %kind, content_type = kind.content_type(), path = %path.display(), "Export saved");
                ExportOutcome::Saved(path)
            }
            Err(StudioError::MissingRenderTarget(id)) => {
                metrics::record_export(kind, "missing_target");
                tracing::error!(element_id = %id, "Invoice preview element not found");
                ExportOutcome::Skipped
            }
            Err(e) => {
                metrics::record_export(kind, "skipped");
                tracing::error!(kind = %kind, "Error generating {}: {}", kind, e);
                ExportOutcome::Skipped
            }
        }
    }

    pub async fn export_image(&self, surface: &PreviewSurface, invoice_number: &str) -> ExportOutcome {
        self.export(ExportKind::Image, surface, invoice_number).await
    }

    pub async fn export_pdf(&self, surface: &PreviewSurface, invoice_number: &str) -> ExportOutcome {
        self.export(ExportKind::Pdf, surface, invoice_number).await
    }

    async fn try_export(
        &self,
        kind: ExportKind,
        surface: &PreviewSurface,
        invoice_number: &str,
    ) -> StudioResult<std::path::PathBuf> {
        let region = surface
            .find(PREVIEW_ELEMENT_ID)
            .ok_or_else(|| StudioError::MissingRenderTarget(PREVIEW_ELEMENT_ID.to_string()))?;

        let bitmap = {
            let _capture_mode = surface.hide_overflow();
            self.capture.capture(&region, self.scale).await?
        };
        let (width, height) = bitmap.dimensions();
        let png = encode_png(bitmap)?;

        let bytes = match kind {
            ExportKind::Image => png,
            ExportKind::Pdf => {
                let placement = fit_to_page(&self.page, width, height)?;
                self.writer.write_page(&png, &placement, &self.page).await?
            }
        };

        self.sink.save(&file_name(invoice_number, kind), bytes).await
    }
}

fn encode_png(bitmap: RgbaImage) -> StudioResult<Vec<u8>> {
    let mut buffer = Vec::new();
    DynamicImage::ImageRgba8(bitmap).write_to(&mut Cursor::new(&mut buffer), ImageOutputFormat::Png)?;
    Ok(buffer)
}

/// `{invoice_number}.{ext}`; un número vacío usa "invoice" y los separadores de ruta se reemplazan
pub fn file_name(invoice_number: &str, kind: ExportKind) -> String {
    let stem: String = invoice_number
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '-' } else { c })
        .collect();
    let stem = if stem.is_empty() { "invoice".to_string() } else { stem };
    format!("{}.{}", stem, kind.extension())
}
