//! Glyph submission on top of the atlas manager.

use crate::atlas::{FontAtlasManager, GlyphPlacement, GlyphStore, ShelfGlyphStore};
use crate::config::AtlasConfig;
use crate::error::AtlasResult;
use crate::font_storage::GlyphRasterizer;
use crate::frame_stats::{DrawCounts, FrameStats};
use crate::glyph_id::{GlyphId, PositionedGlyph};
use crate::paint::Vertex;
use crate::renderer::TextureBackend;
use crate::state::{DrawState, PixelRatio};

/// Draws positioned glyphs through a [`FontAtlasManager`].
///
/// This is the frame driver for the atlas: it owns the backend, packs glyphs
/// on demand, grows the atlas when packing fails and compacts it in
/// [`end_frame`](Self::end_frame). Dropping the renderer releases every atlas
/// texture.
pub struct TextRenderer<B: TextureBackend> {
    backend: B,
    atlas: FontAtlasManager<ShelfGlyphStore>,
    pixel_ratio: PixelRatio,
    stats: FrameStats,
    /// Reused between calls.
    vertices: Vec<Vertex>,
}

impl<B: TextureBackend> TextRenderer<B> {
    /// Sets up the primary atlas on `backend`.
    ///
    /// Fails when the backend cannot create the primary atlas texture; the
    /// backend is dropped with the error.
    pub fn new(mut backend: B, config: AtlasConfig) -> AtlasResult<Self> {
        let atlas = FontAtlasManager::with_config(config, &mut backend)?;
        Ok(Self {
            backend,
            atlas,
            pixel_ratio: PixelRatio::default(),
            stats: FrameStats::new(),
            vertices: Vec::new(),
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn atlas(&self) -> &FontAtlasManager<ShelfGlyphStore> {
        &self.atlas
    }

    pub fn pixel_ratio(&self) -> &PixelRatio {
        &self.pixel_ratio
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    /// Starts a frame rendered at `device_px_ratio` device pixels per unit.
    pub fn begin_frame(&mut self, device_px_ratio: f32) {
        self.pixel_ratio = PixelRatio::new(device_px_ratio);
        self.stats.reset();
    }

    /// Draws `glyphs` at `font_size` user units with the state's fill.
    ///
    /// Glyphs missing from the atlas are rasterized and packed. When the
    /// atlas is full the vertices gathered so far are submitted, the atlas
    /// grows and the glyph is packed again; if the atlas cannot grow the
    /// glyph is skipped.
    pub fn draw_glyphs(
        &mut self,
        state: &DrawState,
        font_size: f32,
        glyphs: &[PositionedGlyph],
        rasterizer: &mut impl GlyphRasterizer,
    ) -> DrawCounts {
        let scale = self.atlas.font_scale(state) * self.pixel_ratio.device_px_ratio;
        if scale.is_nan() || scale <= 0.0 || font_size.is_nan() || font_size <= 0.0 {
            return DrawCounts::default();
        }
        let pixel_size = font_size * scale;

        let mut counts = DrawCounts::default();
        let mut vertices = std::mem::take(&mut self.vertices);
        vertices.clear();

        for glyph in glyphs {
            let glyph_id = GlyphId::new(glyph.font_id, glyph.glyph_index, pixel_size);
            let Some(placement) =
                self.glyph_placement(glyph_id, state, rasterizer, &mut vertices, &mut counts)
            else {
                continue;
            };
            if placement.rect.is_empty() {
                continue;
            }
            self.push_quad(&mut vertices, state, glyph, &placement, scale);
        }

        self.atlas.flush_text_texture(&mut self.backend);
        if !vertices.is_empty() {
            counts += self
                .atlas
                .render_text(&mut self.backend, state, &self.pixel_ratio, &vertices);
        }

        self.vertices = vertices;
        self.stats.record(counts);
        counts
    }

    /// Uploads outstanding glyphs and compacts the atlas ring.
    ///
    /// Returns the totals of the frame. Must be called after all draws of
    /// the frame have been submitted.
    pub fn end_frame(&mut self) -> DrawCounts {
        self.atlas.flush_text_texture(&mut self.backend);
        self.atlas.pack(&mut self.backend);
        self.stats.totals()
    }

    fn glyph_placement(
        &mut self,
        glyph_id: GlyphId,
        state: &DrawState,
        rasterizer: &mut impl GlyphRasterizer,
        pending: &mut Vec<Vertex>,
        counts: &mut DrawCounts,
    ) -> Option<GlyphPlacement> {
        if let Some(placement) = self.atlas.glyph(&glyph_id) {
            return Some(placement);
        }

        let raster = rasterizer.rasterize(&glyph_id)?;
        if let Some(placement) = self.atlas.place_glyph(glyph_id, &raster) {
            return Some(placement);
        }

        // pending quads point into the current atlas, draw them before it changes
        if !pending.is_empty() {
            self.atlas.flush_text_texture(&mut self.backend);
            *counts += self
                .atlas
                .render_text(&mut self.backend, state, &self.pixel_ratio, pending);
            pending.clear();
        }

        if !self.atlas.alloc_text_atlas(&mut self.backend) {
            log::debug!("Dropping glyph {:?}, font atlas is full.", glyph_id);
            return None;
        }

        let placement = self.atlas.place_glyph(glyph_id, &raster);
        if placement.is_none() {
            log::debug!("Glyph {:?} does not fit an empty atlas.", glyph_id);
        }
        placement
    }

    fn push_quad(
        &self,
        vertices: &mut Vec<Vertex>,
        state: &DrawState,
        glyph: &PositionedGlyph,
        placement: &GlyphPlacement,
        scale: f32,
    ) {
        let atlas_size = self.atlas.store().size();
        let inv_scale = 1.0 / scale;
        let rect = placement.rect;

        // device pixels, y down
        let x0 = (glyph.x * scale + placement.xmin as f32).floor();
        let y1 = (glyph.y * scale - placement.ymin as f32).floor();
        let x1 = x0 + rect.width() as f32;
        let y0 = y1 - rect.height() as f32;

        let s0 = rect.min.x as f32 / atlas_size.width as f32;
        let t0 = rect.min.y as f32 / atlas_size.height as f32;
        let s1 = rect.max.x as f32 / atlas_size.width as f32;
        let t1 = rect.max.y as f32 / atlas_size.height as f32;

        let corner = |x: f32, y: f32| {
            state
                .transform
                .transform_point(euclid::point2(x * inv_scale, y * inv_scale))
        };
        let top_left = corner(x0, y0);
        let top_right = corner(x1, y0);
        let bottom_right = corner(x1, y1);
        let bottom_left = corner(x0, y1);

        vertices.extend_from_slice(&[
            Vertex::new(top_left.x, top_left.y, s0, t0),
            Vertex::new(bottom_right.x, bottom_right.y, s1, t1),
            Vertex::new(top_right.x, top_right.y, s1, t0),
            Vertex::new(top_left.x, top_left.y, s0, t0),
            Vertex::new(bottom_left.x, bottom_left.y, s0, t1),
            Vertex::new(bottom_right.x, bottom_right.y, s1, t1),
        ]);
    }
}

impl<B: TextureBackend> Drop for TextRenderer<B> {
    fn drop(&mut self) {
        self.atlas.dispose(&mut self.backend);
    }
}
