use std::collections::HashMap;
use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};

use crate::surface::Surface;

/// The two layers the sketchpad paints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerSlot {
    Overlay,
    Main,
}

impl LayerSlot {
    fn texture_name(self) -> &'static str {
        match self {
            Self::Overlay => "sketchpad_overlay",
            Self::Main => "sketchpad_main",
        }
    }
}

struct CachedTexture {
    generation: u64,
    handle: TextureHandle,
}

/// Keeps one texture per layer and re-uploads it only when the surface changed
#[derive(Default)]
pub struct TextureManager {
    textures: HashMap<LayerSlot, CachedTexture>,
    uploads: u64,
}

impl TextureManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the texture for `slot`, uploading `surface` if its pixels changed.
    pub fn texture_for(&mut self, slot: LayerSlot, surface: &Surface, ctx: &Context) -> TextureId {
        if let Some(cached) = self.textures.get(&slot) {
            if cached.generation == surface.generation() {
                return cached.handle.id();
            }
        }

        let image = color_image(surface);
        self.uploads += 1;

        match self.textures.get_mut(&slot) {
            Some(cached) => {
                cached.handle.set(image, TextureOptions::NEAREST);
                cached.generation = surface.generation();
                cached.handle.id()
            }
            None => {
                let handle = ctx.load_texture(slot.texture_name(), image, TextureOptions::NEAREST);
                let id = handle.id();
                self.textures.insert(
                    slot,
                    CachedTexture {
                        generation: surface.generation(),
                        handle,
                    },
                );
                id
            }
        }
    }

    /// Drops the texture for a layer that no longer exists
    pub fn release(&mut self, slot: LayerSlot) {
        self.textures.remove(&slot);
    }

    pub fn cache_size(&self) -> usize {
        self.textures.len()
    }

    /// Total number of uploads performed, for diagnostics
    pub fn upload_count(&self) -> u64 {
        self.uploads
    }
}

fn color_image(surface: &Surface) -> ColorImage {
    let size = [surface.width() as usize, surface.height() as usize];
    ColorImage::from_rgba_unmultiplied(size, surface.image().as_raw())
}
