use std::env;

use anyhow::{bail, Context, Result};
use chrono::Local;
use invoice_studio::metrics;
use invoice_studio::templates::InvoiceTemplate;
use invoice_studio::{ExportKind, InvoiceRecord, InvoiceType, RecordField, Session, StudioConfig, TemplateRegistry};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mode = env::args().nth(1).unwrap_or_else(|| "both".to_string());
    let kinds = match mode.as_str() {
        "png" => vec![ExportKind::Image],
        "pdf" => vec![ExportKind::Pdf],
        "both" => vec![ExportKind::Image, ExportKind::Pdf],
        "list" => {
            for (invoice_type, label, template_id) in TemplateRegistry::list() {
                let description = TemplateRegistry::select(invoice_type).description();
                println!("{:<16} {:<24} {:<18} {}", invoice_type.as_str(), label, template_id, description);
            }
            return Ok(());
        }
        other => bail!("Modo desconocido '{}': use png, pdf, both o list", other),
    };

    // Initialize Prometheus metrics
    prometheus::default_registry()
        .register(Box::new(prometheus::process_collector::ProcessCollector::for_self()))?;

    let config = StudioConfig::from_env()?;
    tracing::info!(
        "Starting invoice studio (output: {}, typst: {}, {} ppi)",
        config.output_dir.display(),
        config.typst_bin,
        config.capture_ppi()
    );

    let mut session = Session::from_config(load_record()?, &config)?;

    if let Ok(raw) = env::var("INVOICE_TYPE") {
        let invoice_type: InvoiceType = raw.parse().map_err(anyhow::Error::msg)?;
        session.apply(RecordField::Type(invoice_type));
    }

    let record = session.record();
    tracing::info!(
        "Invoice {} ({}): subtotal {:.2}, tax {:.2}, total {:.2}",
        record.invoice_number,
        record.invoice_type,
        record.subtotal,
        record.tax_amount,
        record.total
    );

    for kind in kinds {
        let outcome = session.request_export(kind).await;
        if !outcome.is_saved() {
            tracing::warn!("{} export produced no file", kind);
        }
    }

    tracing::debug!("Metrics:\n{}", metrics::gather_text());

    Ok(())
}

fn load_record() -> Result<InvoiceRecord> {
    match env::var("INVOICE_RECORD") {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path).with_context(|| format!("No se pudo leer {}", path))?;
            InvoiceRecord::from_json(&raw).with_context(|| format!("Registro inválido en {}", path))
        }
        Err(_) => Ok(InvoiceRecord::seed(Local::now().date_naive())),
    }
}
