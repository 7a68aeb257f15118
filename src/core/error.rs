use thiserror::Error;

#[derive(Debug, Error)]
pub enum StudioError {
    /// La región de vista previa no está montada cuando se solicita la exportación
    #[error("Región de vista previa no encontrada: {0}")]
    MissingRenderTarget(String),

    #[error("Error de captura: {0}")]
    Capture(String),

    #[error("Error de plantilla: {0}")]
    Template(String),

    #[error("Error de configuración: {0}")]
    Config(String),

    #[error("Error de E/S: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error de imagen: {0}")]
    Image(#[from] image::ImageError),
}

impl From<minijinja::Error> for StudioError {
    fn from(error: minijinja::Error) -> Self {
        StudioError::Template(error.to_string())
    }
}

impl From<serde_json::Error> for StudioError {
    fn from(error: serde_json::Error) -> Self {
        StudioError::Template(error.to_string())
    }
}

pub type StudioResult<T> = Result<T, StudioError>;
