pub mod core;
pub mod editor;
pub mod export;
pub mod generators;
pub mod metrics;
pub mod models;
pub mod preview;
pub mod session;
pub mod storage;
pub mod templates;

// Re-export commonly used types
pub use crate::core::{PageConfig, StudioConfig, StudioError, StudioResult};
pub use editor::{parse_amount, ItemField, RecordField};
pub use export::ExportAdapter;
pub use models::{ExportKind, ExportOutcome, InvoiceItem, InvoiceRecord, InvoiceType, Party, Totals};
pub use preview::{PreviewSurface, RenderedRegion, PREVIEW_ELEMENT_ID};
pub use session::{CoordinatorState, Session};
pub use templates::{RenderContext, RenderedDocument, TemplateRegistry};
