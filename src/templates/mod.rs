pub mod template_trait;
pub mod templates;

pub use template_trait::{InvoiceTemplate, RenderContext, RenderedDocument, TemplateRegistry};
pub use templates::GstSplit;
