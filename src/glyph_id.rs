/// Rendered sizes are keyed in tenths of a pixel.
pub const SIZE_QUANTIZE: f32 = 10.0;

/// Atlas key of one rasterized glyph.
///
/// The size is the pixel size the glyph is rasterized at, that is the
/// requested font size already multiplied by the render scale. Two requests
/// closer than a tenth of a pixel share an atlas entry.
///
/// IDs are only stable within one [`FontStorage`](crate::FontStorage).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GlyphId {
    font_id: fontdb::ID,
    glyph_index: u16,
    size: u32,
}

impl GlyphId {
    pub fn new(font_id: fontdb::ID, glyph_index: u16, pixel_size: f32) -> Self {
        Self {
            font_id,
            glyph_index,
            size: (pixel_size.max(0.0) * SIZE_QUANTIZE).round() as u32,
        }
    }

    pub fn font_id(&self) -> fontdb::ID {
        self.font_id
    }

    pub fn glyph_index(&self) -> u16 {
        self.glyph_index
    }

    /// Pixel size the glyph is rasterized at.
    pub fn pixel_size(&self) -> f32 {
        self.size as f32 / SIZE_QUANTIZE
    }
}

/// A glyph placed by the caller's layout, pen position in user space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionedGlyph {
    pub font_id: fontdb::ID,
    pub glyph_index: u16,
    pub x: f32,
    /// Baseline position.
    pub y: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_sizes_share_a_key() {
        let id = fontdb::ID::dummy();
        assert_eq!(GlyphId::new(id, 3, 12.01), GlyphId::new(id, 3, 11.99));
        assert_ne!(GlyphId::new(id, 3, 12.0), GlyphId::new(id, 3, 12.2));
        assert_ne!(GlyphId::new(id, 3, 12.0), GlyphId::new(id, 4, 12.0));
    }

    #[test]
    fn pixel_size_round_trips_at_tenths() {
        let glyph = GlyphId::new(fontdb::ID::dummy(), 0, 14.5);
        assert_eq!(glyph.pixel_size(), 14.5);
    }
}
