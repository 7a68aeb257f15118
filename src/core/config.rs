use std::env;
use std::path::PathBuf;
use std::time::Duration;

use super::error::{StudioError, StudioResult};

/// Página donde se incrusta la captura al exportar a PDF, en milímetros
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageConfig {
    pub width_mm: f32,
    pub height_mm: f32,
}

impl PageConfig {
    /// A4 vertical
    pub const A4: PageConfig = PageConfig {
        width_mm: 210.0,
        height_mm: 297.0,
    };

    pub fn dimensions(&self) -> (f32, f32) {
        (self.width_mm, self.height_mm)
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        PageConfig::A4
    }
}

#[derive(Debug, Clone)]
pub struct StudioConfig {
    pub output_dir: PathBuf,
    pub temp_dir: PathBuf,
    pub typst_bin: String,
    pub capture_scale: f32,
    pub mount_timeout: Duration,
    pub currency_symbol: String,
    pub page: PageConfig,
}

impl Default for StudioConfig {
    fn default() -> Self {
        StudioConfig {
            output_dir: PathBuf::from("output"),
            temp_dir: env::temp_dir(),
            typst_bin: "typst".to_string(),
            capture_scale: 2.0,
            mount_timeout: Duration::from_millis(2000),
            currency_symbol: "₹".to_string(),
            page: PageConfig::default(),
        }
    }
}

impl StudioConfig {
    pub fn from_env() -> StudioResult<Self> {
        let default = StudioConfig::default();

        let capture_scale = match env::var("CAPTURE_SCALE") {
            Ok(raw) => raw
                .parse::<f32>()
                .map_err(|e| StudioError::Config(format!("CAPTURE_SCALE inválido: {}", e)))?,
            Err(_) => default.capture_scale,
        };
        if !(capture_scale > 0.0) {
            return Err(StudioError::Config(format!(
                "CAPTURE_SCALE debe ser positivo, recibido {}",
                capture_scale
            )));
        }

        let mount_timeout = match env::var("MOUNT_TIMEOUT_MS") {
            Ok(raw) => Duration::from_millis(
                raw.parse::<u64>()
                    .map_err(|e| StudioError::Config(format!("MOUNT_TIMEOUT_MS inválido: {}", e)))?,
            ),
            Err(_) => default.mount_timeout,
        };

        Ok(StudioConfig {
            output_dir: env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.output_dir),
            temp_dir: env::var("TEMP_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.temp_dir),
            typst_bin: env::var("TYPST_BIN").unwrap_or(default.typst_bin),
            capture_scale,
            mount_timeout,
            currency_symbol: env::var("CURRENCY_SYMBOL").unwrap_or(default.currency_symbol),
            page: default.page,
        })
    }

    /// Resolución de captura: la escala se aplica sobre 72 ppi
    pub fn capture_ppi(&self) -> f32 {
        72.0 * self.capture_scale
    }
}
