use std::fmt;
use std::path::PathBuf;

/// Formato de salida de una exportación
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportKind {
    Pdf,
    Image,
}

impl ExportKind {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportKind::Pdf => "pdf",
            ExportKind::Image => "png",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ExportKind::Pdf => "application/pdf",
            ExportKind::Image => "image/png",
        }
    }
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportKind::Pdf => write!(f, "pdf"),
            ExportKind::Image => write!(f, "image"),
        }
    }
}

/// Resultado observable de una exportación. Los fallos no se propagan:
/// simplemente no se guarda ningún archivo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Saved(PathBuf),
    Skipped,
}

impl ExportOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, ExportOutcome::Saved(_))
    }
}
