use std::sync::Arc;
use std::time::Duration;

use crate::core::{StudioConfig, StudioResult};
use crate::editor::{ItemField, RecordField};
use crate::export::ExportAdapter;
use crate::models::{ExportKind, ExportOutcome, InvoiceRecord};
use crate::preview::{PreviewSurface, PREVIEW_ELEMENT_ID};
use crate::templates::{RenderContext, TemplateRegistry};

/// Estado observable del coordinador
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoordinatorState {
    pub preview_visible: bool,
    pub pending_export: Option<ExportKind>,
}

/// Sesión de edición: dueña única de la factura, la vista previa y las exportaciones
pub struct Session {
    record: InvoiceRecord,
    registry: Arc<TemplateRegistry>,
    surface: Arc<PreviewSurface>,
    exporter: ExportAdapter,
    currency_symbol: String,
    mount_timeout: Duration,
    state: CoordinatorState,
}

impl Session {
    pub fn new(
        record: InvoiceRecord,
        registry: Arc<TemplateRegistry>,
        surface: Arc<PreviewSurface>,
        exporter: ExportAdapter,
        currency_symbol: impl Into<String>,
        mount_timeout: Duration,
    ) -> Self {
        Session {
            record,
            registry,
            surface,
            exporter,
            currency_symbol: currency_symbol.into(),
            mount_timeout,
            state: CoordinatorState::default(),
        }
    }

    pub fn from_config(record: InvoiceRecord, config: &StudioConfig) -> StudioResult<Self> {
        Ok(Self::new(
            record,
            Arc::new(TemplateRegistry::new()?),
            Arc::new(PreviewSurface::new()),
            ExportAdapter::from_config(config),
            config.currency_symbol.clone(),
            config.mount_timeout,
        ))
    }

    pub fn record(&self) -> &InvoiceRecord {
        &self.record
    }

    pub fn state(&self) -> CoordinatorState {
        self.state
    }

    pub fn surface(&self) -> &Arc<PreviewSurface> {
        &self.surface
    }

    /// Aplica una edición arbitraria y refresca la vista previa si está visible
    pub fn edit<F>(&mut self, f: F)
    where
        F: FnOnce(&mut InvoiceRecord),
    {
        f(&mut self.record);
        if self.state.preview_visible {
            self.render_preview();
        }
    }

    pub fn apply(&mut self, field: RecordField) {
        self.edit(|record| record.apply(field));
    }

    pub fn add_item(&mut self) -> String {
        let mut id = String::new();
        self.edit(|record| id = record.add_item());
        id
    }

    pub fn update_item(&mut self, id: &str, field: ItemField) {
        self.edit(|record| record.update_item(id, field));
    }

    pub fn remove_item(&mut self, id: &str) {
        self.edit(|record| record.remove_item(id));
    }

    /// Alterna la visibilidad. Ocultar desmonta la región; la exportación pendiente no cambia.
    pub fn toggle_preview(&mut self) {
        self.state.preview_visible = !self.state.preview_visible;
        if self.state.preview_visible {
            self.render_preview();
        } else {
            self.surface.unmount(PREVIEW_ELEMENT_ID);
        }
        tracing::debug!(visible = self.state.preview_visible, "preview toggled");
    }

    /// Con la vista previa oculta la muestra, deja la exportación pendiente y la
    /// dispara en cuanto la región está montada. Con la vista previa visible exporta ya.
    pub async fn request_export(&mut self, kind: ExportKind) -> ExportOutcome {
        if self.state.preview_visible {
            return self.exporter.export(kind, &self.surface, &self.record.invoice_number).await;
        }

        self.state.preview_visible = true;
        self.state.pending_export = Some(kind);
        let target = self.surface.generation() + 1;

        if !self.render_preview() {
            tracing::warn!(kind = %kind, "Preview could not be rendered, exporting without waiting");
        } else if !self.surface.wait_mounted(target, self.mount_timeout).await {
            tracing::warn!(
                kind = %kind,
                timeout_ms = self.mount_timeout.as_millis() as u64,
                "Preview did not report mounted in time, exporting anyway"
            );
        }

        let Some(pending) = self.state.pending_export.take() else {
            return ExportOutcome::Skipped;
        };
        self.exporter.export(pending, &self.surface, &self.record.invoice_number).await
    }

    /// Devuelve `false` si la plantilla no se pudo renderizar y no se montó nada
    fn render_preview(&self) -> bool {
        let ctx = RenderContext::now(self.currency_symbol.clone());
        match self.registry.render(&self.record, &ctx) {
            Ok(document) => {
                self.surface.mount(PREVIEW_ELEMENT_ID, document);
                true
            }
            Err(e) => {
                tracing::error!("Error rendering preview: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PageConfig, StudioError};
    use crate::generators::{PageWriter, Placement, RegionCapture};
    use crate::preview::RenderedRegion;
    use crate::storage::FileSink;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use image::{Rgba, RgbaImage};
    use std::path::PathBuf;
    use std::sync::Mutex;

    struct BlankCapture;

    #[async_trait]
    impl RegionCapture for BlankCapture {
        async fn capture(&self, _region: &RenderedRegion, _scale: f32) -> StudioResult<RgbaImage> {
            Ok(RgbaImage::from_pixel(4, 8, Rgba([255, 255, 255, 255])))
        }
    }

    struct NoPdf;

    #[async_trait]
    impl PageWriter for NoPdf {
        async fn write_page(&self, _png: &[u8], _placement: &Placement, _page: &PageConfig) -> StudioResult<Vec<u8>> {
            Err(StudioError::Capture("no pdf".to_string()))
        }
    }

    #[derive(Default)]
    struct NamesSink {
        names: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl FileSink for NamesSink {
        async fn save(&self, file_name: &str, _bytes: Vec<u8>) -> StudioResult<PathBuf> {
            self.names.lock().unwrap().push(file_name.to_string());
            Ok(PathBuf::from(file_name))
        }
    }

    fn session(sink: Arc<NamesSink>) -> Session {
        let record = InvoiceRecord::seed(NaiveDate::from_ymd_opt(2026, 10, 14).unwrap());
        let exporter = ExportAdapter::new(Arc::new(BlankCapture), Arc::new(NoPdf), sink, 2.0, PageConfig::default());
        Session::new(
            record,
            Arc::new(TemplateRegistry::new().unwrap()),
            Arc::new(PreviewSurface::new()),
            exporter,
            "₹",
            Duration::from_millis(500),
        )
    }

    #[test]
    fn test_initial_state_is_hidden_without_pending() {
        let session = session(Arc::new(NamesSink::default()));
        assert_eq!(session.state(), CoordinatorState::default());
        assert!(session.surface().find(PREVIEW_ELEMENT_ID).is_none());
    }

    #[test]
    fn test_toggle_mounts_and_unmounts() {
        let mut session = session(Arc::new(NamesSink::default()));

        session.toggle_preview();
        assert!(session.state().preview_visible);
        assert!(session.surface().find(PREVIEW_ELEMENT_ID).is_some());

        session.toggle_preview();
        assert!(!session.state().preview_visible);
        assert!(session.surface().find(PREVIEW_ELEMENT_ID).is_none());
    }

    #[test]
    fn test_edits_rerender_visible_preview() {
        let mut session = session(Arc::new(NamesSink::default()));
        session.toggle_preview();
        let before = session.surface().generation();

        session.apply(RecordField::ClientName("Asha Traders".to_string()));

        let region = session.surface().find(PREVIEW_ELEMENT_ID).unwrap();
        assert!(region.generation > before);
        assert!(region.source.contains("Asha Traders"));
    }

    #[test]
    fn test_type_change_switches_template() {
        let mut session = session(Arc::new(NamesSink::default()));
        session.toggle_preview();
        session.apply(RecordField::Type(crate::models::InvoiceType::RestaurantBill));

        let region = session.surface().find(PREVIEW_ELEMENT_ID).unwrap();
        assert_eq!(region.template_id, "restaurant_bill");
    }

    #[tokio::test]
    async fn test_export_while_hidden_shows_preview_and_fires_once() {
        let sink = Arc::new(NamesSink::default());
        let mut session = session(sink.clone());

        let outcome = session.request_export(ExportKind::Image).await;

        assert_eq!(outcome, ExportOutcome::Saved(PathBuf::from("INV-001.png")));
        assert_eq!(*sink.names.lock().unwrap(), vec!["INV-001.png".to_string()]);
        assert_eq!(
            session.state(),
            CoordinatorState {
                preview_visible: true,
                pending_export: None,
            }
        );
    }

    #[tokio::test]
    async fn test_export_while_visible_runs_immediately() {
        let sink = Arc::new(NamesSink::default());
        let mut session = session(sink.clone());
        session.toggle_preview();
        let generation = session.surface().generation();

        session.request_export(ExportKind::Image).await;

        assert_eq!(session.surface().generation(), generation);
        assert_eq!(sink.names.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unrenderable_preview_skips_export_without_waiting() {
        let sink = Arc::new(NamesSink::default());
        let record = InvoiceRecord::seed(NaiveDate::from_ymd_opt(2026, 10, 14).unwrap());
        let exporter = ExportAdapter::new(
            Arc::new(BlankCapture),
            Arc::new(NoPdf),
            sink.clone(),
            2.0,
            PageConfig::default(),
        );
        let mut session = Session::new(
            record,
            Arc::new(TemplateRegistry::without_templates()),
            Arc::new(PreviewSurface::new()),
            exporter,
            "₹",
            Duration::from_secs(30),
        );

        let outcome = tokio::time::timeout(Duration::from_secs(5), session.request_export(ExportKind::Image))
            .await
            .expect("export waited for the mount timeout");

        assert_eq!(outcome, ExportOutcome::Skipped);
        assert!(sink.names.lock().unwrap().is_empty());
        assert_eq!(
            session.state(),
            CoordinatorState {
                preview_visible: true,
                pending_export: None,
            }
        );
    }

    #[tokio::test]
    async fn test_nan_price_still_exports() {
        let sink = Arc::new(NamesSink::default());
        let mut session = session(sink.clone());
        session.update_item("1", ItemField::Price(f64::NAN));

        let outcome = session.request_export(ExportKind::Image).await;

        assert_eq!(outcome, ExportOutcome::Saved(PathBuf::from("INV-001.png")));
        let region = session.surface().find(PREVIEW_ELEMENT_ID).unwrap();
        assert!(region.source.contains("₹NaN"));
    }

    #[tokio::test]
    async fn test_failed_export_leaves_record_untouched() {
        let sink = Arc::new(NamesSink::default());
        let mut session = session(sink.clone());
        let before = session.record().clone();

        let outcome = session.request_export(ExportKind::Pdf).await;

        assert_eq!(outcome, ExportOutcome::Skipped);
        assert_eq!(session.record(), &before);
        assert!(sink.names.lock().unwrap().is_empty());
        assert_eq!(session.state().pending_export, None);
    }
}
