use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use tokio::sync::watch;

use crate::templates::RenderedDocument;

/// Identificador fijo de la región que capturan las exportaciones
pub const PREVIEW_ELEMENT_ID: &str = "invoice-preview";

/// Región montada en la superficie de vista previa
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedRegion {
    pub element_id: String,
    pub template_id: &'static str,
    pub source: String,
    pub generation: u64,
}

/// Superficie donde se montan los documentos renderizados.
///
/// Cada montaje incrementa una generación y la publica por un canal `watch`;
/// quien necesite esperar a que la vista previa esté lista espera esa señal.
pub struct PreviewSurface {
    regions: RwLock<HashMap<String, Arc<RenderedRegion>>>,
    mounted: watch::Sender<u64>,
    overflow_hidden: AtomicBool,
}

impl PreviewSurface {
    pub fn new() -> Self {
        let (mounted, _) = watch::channel(0);
        PreviewSurface {
            regions: RwLock::new(HashMap::new()),
            mounted,
            overflow_hidden: AtomicBool::new(false),
        }
    }

    /// Monta (o reemplaza) la región `element_id` y avisa a los suscriptores
    pub fn mount(&self, element_id: &str, document: RenderedDocument) -> u64 {
        let mut regions = self.regions.write().unwrap_or_else(|e| e.into_inner());

        let generation = *self.mounted.borrow() + 1;
        let region = RenderedRegion {
            element_id: element_id.to_string(),
            template_id: document.template_id,
            source: document.source,
            generation,
        };
        regions.insert(element_id.to_string(), Arc::new(region));
        self.mounted.send_replace(generation);
        drop(regions);

        tracing::debug!(element_id, generation, "preview mounted");
        generation
    }

    pub fn unmount(&self, element_id: &str) {
        let mut regions = self.regions.write().unwrap_or_else(|e| e.into_inner());
        if regions.remove(element_id).is_some() {
            tracing::debug!(element_id, "preview unmounted");
        }
    }

    pub fn find(&self, element_id: &str) -> Option<Arc<RenderedRegion>> {
        let regions = self.regions.read().unwrap_or_else(|e| e.into_inner());
        regions.get(element_id).cloned()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.mounted.subscribe()
    }

    pub fn generation(&self) -> u64 {
        *self.mounted.borrow()
    }

    /// Espera hasta que se haya montado la generación `generation` o una posterior.
    /// Devuelve `false` si vence el plazo.
    pub async fn wait_mounted(&self, generation: u64, timeout: Duration) -> bool {
        let mut rx = self.subscribe();
        let reached = tokio::time::timeout(timeout, rx.wait_for(|current| *current >= generation)).await;
        matches!(reached, Ok(Ok(_)))
    }

    /// Modo captura: oculta el desbordamiento hasta que se suelta la guarda
    pub fn hide_overflow(&self) -> OverflowGuard<'_> {
        let previous = self.overflow_hidden.swap(true, Ordering::SeqCst);
        OverflowGuard {
            surface: self,
            previous,
        }
    }

    pub fn overflow_hidden(&self) -> bool {
        self.overflow_hidden.load(Ordering::SeqCst)
    }
}

impl Default for PreviewSurface {
    fn default() -> Self {
        Self::new()
    }
}

/// Restaura el estado de desbordamiento anterior al soltarse, incluso si la captura falla
pub struct OverflowGuard<'a> {
    surface: &'a PreviewSurface,
    previous: bool,
}

impl Drop for OverflowGuard<'_> {
    fn drop(&mut self) {
        self.surface.overflow_hidden.store(self.previous, Ordering::SeqCst);
    }
}
