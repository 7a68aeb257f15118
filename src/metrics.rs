use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec, TextEncoder,
};

use crate::models::ExportKind;

/// Exportaciones por tipo y resultado (saved, skipped, missing_target)
pub static EXPORTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "invoice_exports_total",
        "Total de exportaciones de la vista previa",
        &["kind", "outcome"]
    )
    .expect("Failed to register invoice_exports_total")
});

pub static EXPORT_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "invoice_export_duration_seconds",
        "Duración de captura y guardado",
        &["kind"],
        vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("Failed to register invoice_export_duration_seconds")
});

pub fn record_export(kind: ExportKind, outcome: &str) {
    EXPORTS_TOTAL.with_label_values(&[&kind.to_string(), outcome]).inc();
}

pub fn observe_duration(kind: ExportKind, seconds: f64) {
    EXPORT_DURATION.with_label_values(&[&kind.to_string()]).observe(seconds);
}

/// Métricas del registro por defecto en formato texto
pub fn gather_text() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        tracing::warn!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
