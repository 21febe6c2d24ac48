use crate::config::AtlasConfig;
use crate::error::{AtlasError, AtlasResult};
use crate::font_storage::RasterizedGlyph;
use crate::frame_stats::DrawCounts;
use crate::glyph_id::GlyphId;
use crate::paint::{Paint, Vertex};
use crate::renderer::{ImageFlags, TextureBackend, TextureId, TextureKind};
use crate::state::{DrawState, PixelRatio, font_scale};

use super::slot_ring::{SlotRing, grown_size};
use super::{GlyphPacker, GlyphPlacement, GlyphStore, ShelfGlyphStore, Size};

/// Owns the glyph store and the atlas textures it is mirrored into.
///
/// The backend is borrowed per call since the renderer shares it with
/// everything else it draws. Textures stay alive until [`dispose`] is called;
/// dropping the manager alone does not release them.
///
/// [`dispose`]: Self::dispose
pub struct FontAtlasManager<S = ShelfGlyphStore> {
    config: AtlasConfig,
    store: S,
    ring: SlotRing,
}

impl FontAtlasManager<ShelfGlyphStore> {
    /// Creates a manager backed by a [`ShelfGlyphStore`].
    pub fn with_config(
        config: AtlasConfig,
        backend: &mut impl TextureBackend,
    ) -> AtlasResult<Self> {
        let store = ShelfGlyphStore::new(config.initial_extent());
        Self::new(config, store, backend)
    }
}

impl<S: GlyphStore> FontAtlasManager<S> {
    /// Creates the primary atlas texture and resets `store` to match it.
    ///
    /// Fails if the configuration is invalid or the backend cannot create
    /// the texture; in both cases nothing is left allocated.
    pub fn new(
        config: AtlasConfig,
        mut store: S,
        backend: &mut impl TextureBackend,
    ) -> AtlasResult<Self> {
        config.validate()?;

        let size = config.initial_extent();
        let Some(primary) =
            backend.create_texture(TextureKind::Alpha, size, ImageFlags::NONE, None)
        else {
            log::error!(
                "Failed to create font atlas texture ({}x{}).",
                size.width,
                size.height
            );
            return Err(AtlasError::AtlasCreation {
                width: size.width,
                height: size.height,
            });
        };
        store.reset_atlas(size);

        Ok(Self {
            config,
            store,
            ring: SlotRing::new(primary),
        })
    }

    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn slots(&self) -> &SlotRing {
        &self.ring
    }

    /// Index of the atlas glyphs are currently packed into.
    pub fn current(&self) -> usize {
        self.ring.current()
    }

    pub fn current_texture(&self) -> Option<TextureId> {
        self.ring.current_texture()
    }

    /// Glyph rasterization scale for the state's transform.
    pub fn font_scale(&self, state: &DrawState) -> f32 {
        font_scale(&state.transform)
    }

    /// Uploads the store's pending changes to the current atlas texture.
    ///
    /// Issues at most one `update_texture` call. Must run before the atlas
    /// changes and before any draw that samples freshly packed glyphs.
    pub fn flush_text_texture(&mut self, backend: &mut impl TextureBackend) {
        let Some(dirty) = self.store.validate_texture() else {
            return;
        };
        let Some(texture) = self.ring.current_texture() else {
            return;
        };

        let (data, _) = self.store.texture_data();
        backend.update_texture(texture, dirty, data);
    }

    /// Moves glyph packing to the next, larger atlas.
    ///
    /// Reuses a texture already parked in the next slot, otherwise creates
    /// one with [`grown_size`]. A parked texture the backend no longer knows
    /// the size of is deleted and replaced. The store restarts empty at the new size, so
    /// every glyph has to be packed again. Returns `false`, changing nothing,
    /// when all slots are in use or the texture cannot be created.
    pub fn alloc_text_atlas(&mut self, backend: &mut impl TextureBackend) -> bool {
        self.flush_text_texture(backend);

        if self.ring.is_exhausted() {
            log::warn!("All {} font atlases are full.", self.ring.slots().len());
            return false;
        }

        let parked = self
            .ring
            .next_texture()
            .and_then(|texture| Some((texture, backend.texture_size(texture)?)));

        let (texture, size) = match parked {
            Some((texture, size)) => {
                log::debug!(
                    "Reusing font atlas {:?} ({}x{}).",
                    texture,
                    size.width,
                    size.height
                );
                (texture, size)
            }
            None => {
                if let Some(stale) = self.ring.take_next() {
                    log::warn!("Font atlas {:?} has no known size, replacing it.", stale);
                    backend.delete_texture(stale);
                }

                let current = self
                    .ring
                    .current_texture()
                    .and_then(|texture| backend.texture_size(texture))
                    .unwrap_or(self.store.size());
                let size = grown_size(current, self.config.max_size.get());

                let Some(texture) =
                    backend.create_texture(TextureKind::Alpha, size, ImageFlags::NONE, None)
                else {
                    log::warn!(
                        "Failed to create font atlas texture ({}x{}).",
                        size.width,
                        size.height
                    );
                    return false;
                };
                log::debug!(
                    "Created font atlas {:?} ({}x{}).",
                    texture,
                    size.width,
                    size.height
                );
                (texture, size)
            }
        };

        self.ring.advance(texture);
        self.store.reset_atlas(size);
        true
    }

    /// Makes the newest atlas the primary one and deletes outgrown atlases.
    ///
    /// Only call this between frames: submitted draws may still reference
    /// the textures it deletes.
    pub fn pack(&mut self, backend: &mut impl TextureBackend) {
        if self.ring.current() == 0 {
            return;
        }
        let count = self.ring.pack(backend);
        log::debug!("Packed font atlases, {} remaining.", count);
    }

    /// Draws `vertices` as a triangle list sampling the current atlas.
    ///
    /// The state's fill paint is bound to the atlas and its alpha multiplied
    /// by the state's global alpha.
    pub fn render_text(
        &self,
        backend: &mut impl TextureBackend,
        state: &DrawState,
        pixel_ratio: &PixelRatio,
        vertices: &[Vertex],
    ) -> DrawCounts {
        debug_assert!(vertices.len() % 3 == 0, "text vertices must form triangles");

        let mut paint = Paint::for_text(self.ring.current_texture(), &state.fill);
        paint.premultiply_alpha(state.alpha);

        backend.triangles(
            &paint,
            state.composite_operation,
            &state.scissor,
            vertices,
            pixel_ratio.fringe_width,
        );

        DrawCounts::text(vertices.len())
    }

    /// Deletes every atlas texture and empties the store.
    ///
    /// Calling it again is harmless.
    pub fn dispose(&mut self, backend: &mut impl TextureBackend) {
        self.ring.clear(backend);
        self.store.reset_atlas(Size::zero());
    }
}

impl<S: GlyphPacker> FontAtlasManager<S> {
    /// Placement of a glyph packed into the current atlas.
    pub fn glyph(&self, glyph_id: &GlyphId) -> Option<GlyphPlacement> {
        self.store.get(glyph_id)
    }

    /// Packs `glyph` into the current atlas. `None` means the atlas is full.
    pub fn place_glyph(
        &mut self,
        glyph_id: GlyphId,
        glyph: &RasterizedGlyph,
    ) -> Option<GlyphPlacement> {
        self.store.insert(glyph_id, glyph)
    }
}
