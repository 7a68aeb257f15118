use async_trait::async_trait;

use crate::core::{PageConfig, StudioError, StudioResult};

use super::typst::{TypstCompiler, TypstFormat};

/// Posición y tamaño de la imagen en la página, en milímetros
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Escala la imagen para que quepa en la página conservando la proporción.
/// Queda centrada en horizontal y pegada al borde superior.
pub fn fit_to_page(page: &PageConfig, img_width: u32, img_height: u32) -> StudioResult<Placement> {
    if img_width == 0 || img_height == 0 {
        return Err(StudioError::Capture("La captura está vacía".to_string()));
    }

    let (page_width, page_height) = page.dimensions();
    let (page_width, page_height) = (page_width as f64, page_height as f64);
    let (img_width, img_height) = (img_width as f64, img_height as f64);

    let ratio = (page_width / img_width).min(page_height / img_height);
    let width = img_width * ratio;
    let height = img_height * ratio;

    Ok(Placement {
        x: (page_width - width) / 2.0,
        y: 0.0,
        width,
        height,
    })
}

/// Escribe un documento de una página con la imagen colocada
#[async_trait]
pub trait PageWriter: Send + Sync {
    async fn write_page(&self, png: &[u8], placement: &Placement, page: &PageConfig) -> StudioResult<Vec<u8>>;
}

pub struct TypstPageWriter {
    compiler: TypstCompiler,
}

impl TypstPageWriter {
    pub fn new(compiler: TypstCompiler) -> Self {
        TypstPageWriter { compiler }
    }
}

const CAPTURE_ASSET: &str = "capture.png";

/// Fuente Typst de una página sin márgenes con la imagen en `placement`
pub fn page_source(placement: &Placement, page: &PageConfig) -> String {
    let (page_width, page_height) = page.dimensions();
    format!(
        "#set page(width: {:.3}mm, height: {:.3}mm, margin: 0pt)\n\
         #place(top + left, dx: {:.3}mm, dy: {:.3}mm, image(\"{}\", width: {:.3}mm, height: {:.3}mm))\n",
        page_width,
        page_height,
        placement.x,
        placement.y,
        CAPTURE_ASSET,
        placement.width,
        placement.height,
    )
}

#[async_trait]
impl PageWriter for TypstPageWriter {
    async fn write_page(&self, png: &[u8], placement: &Placement, page: &PageConfig) -> StudioResult<Vec<u8>> {
        let source = page_source(placement, page);
        self.compiler
            .compile(&source, TypstFormat::Pdf, &[(CAPTURE_ASSET, png)])
            .await
    }
}
