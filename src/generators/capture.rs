use async_trait::async_trait;
use image::{Rgba, RgbaImage};

use crate::core::{StudioError, StudioResult};
use crate::preview::RenderedRegion;

use super::typst::{TypstCompiler, TypstFormat};

/// Rasteriza una región montada de la vista previa
#[async_trait]
pub trait RegionCapture: Send + Sync {
    /// `scale` multiplica la resolución base de 72 ppi
    async fn capture(&self, region: &RenderedRegion, scale: f32) -> StudioResult<RgbaImage>;
}

/// Captura mediante `typst compile --format png`
pub struct TypstCapture {
    compiler: TypstCompiler,
}

impl TypstCapture {
    pub fn new(compiler: TypstCompiler) -> Self {
        TypstCapture { compiler }
    }
}

#[async_trait]
impl RegionCapture for TypstCapture {
    async fn capture(&self, region: &RenderedRegion, scale: f32) -> StudioResult<RgbaImage> {
        let ppi = 72.0 * scale;
        tracing::debug!(element_id = %region.element_id, ppi, "capturing region");

        let png = self
            .compiler
            .compile(&region.source, TypstFormat::Png { ppi }, &[])
            .await?;

        let decoded = image::load_from_memory(&png)
            .map_err(|e| StudioError::Capture(format!("Captura ilegible: {}", e)))?;

        Ok(flatten_on_white(decoded.to_rgba8()))
    }
}

/// Compone la imagen sobre fondo blanco opaco
pub fn flatten_on_white(mut img: RgbaImage) -> RgbaImage {
    for pixel in img.pixels_mut() {
        let Rgba([r, g, b, a]) = *pixel;
        if a == 255 {
            continue;
        }
        let alpha = a as u32;
        let blend = |c: u8| ((c as u32 * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        *pixel = Rgba([blend(r), blend(g), blend(b), 255]);
    }
    img
}
