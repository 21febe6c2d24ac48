use std::collections::HashMap;

use euclid::{Box2D, Point2D};

use crate::font_storage::RasterizedGlyph;
use crate::glyph_id::GlyphId;

use super::{PixelRect, Size};

/// Gap left to the right of and below every glyph to avoid sampling bleed.
const GLYPH_PADDING: u32 = 1;

/// CPU side of a glyph atlas, as seen by [`FontAtlasManager`](super::FontAtlasManager).
///
/// The store owns one coverage bitmap at a time. The manager only needs to
/// learn which part changed, read the pixels, and start over at a new size.
pub trait GlyphStore {
    /// Dimensions of the current bitmap.
    fn size(&self) -> Size;

    /// Takes the region modified since the previous call, if any.
    fn validate_texture(&mut self) -> Option<PixelRect>;

    /// The whole bitmap, row-major with one byte per pixel.
    fn texture_data(&self) -> (&[u8], Size);

    /// Drops every placed glyph and starts a blank bitmap of `size`.
    fn reset_atlas(&mut self, size: Size);
}

/// Where a glyph ended up in the atlas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphPlacement {
    /// Atlas pixels covered by the glyph bitmap. Empty for blank glyphs.
    pub rect: PixelRect,
    /// Horizontal offset from the pen position to the bitmap's left edge.
    pub xmin: i32,
    /// Vertical offset from the baseline to the bitmap's bottom edge, y up.
    pub ymin: i32,
}

/// Glyph lookup and placement on top of a [`GlyphStore`].
pub trait GlyphPacker: GlyphStore {
    fn get(&self, glyph_id: &GlyphId) -> Option<GlyphPlacement>;

    /// Copies `glyph` into the atlas.
    ///
    /// Returns `None` when there is no room left; the caller is expected to
    /// grow the atlas and try again.
    fn insert(&mut self, glyph_id: GlyphId, glyph: &RasterizedGlyph) -> Option<GlyphPlacement>;
}

/// A horizontal band of glyphs sharing one height.
#[derive(Debug)]
struct Shelf {
    y: u32,
    height: u32,
    cursor_x: u32,
}

/// Shelf-packed glyph store with dirty region tracking.
pub struct ShelfGlyphStore {
    size: Size,
    pixels: Vec<u8>,
    shelves: Vec<Shelf>,
    next_shelf_y: u32,
    placements: HashMap<GlyphId, GlyphPlacement, fxhash::FxBuildHasher>,
    dirty: Option<PixelRect>,
}

impl ShelfGlyphStore {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            pixels: vec![0; Self::pixel_count(size)],
            shelves: Vec::new(),
            next_shelf_y: 0,
            placements: HashMap::with_hasher(fxhash::FxBuildHasher::default()),
            dirty: None,
        }
    }

    /// Number of glyphs placed since the last reset.
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    fn pixel_count(size: Size) -> usize {
        (size.width as usize).saturating_mul(size.height as usize)
    }

    /// Finds room for a `width` x `height` bitmap plus padding.
    fn allocate(&mut self, width: u32, height: u32) -> Option<Point2D<u32, euclid::UnknownUnit>> {
        let padded_width = width + GLYPH_PADDING;
        let padded_height = height + GLYPH_PADDING;
        if padded_width > self.size.width {
            return None;
        }

        // best fit: the lowest shelf that still holds the glyph
        let atlas_width = self.size.width;
        let best = self
            .shelves
            .iter_mut()
            .filter(|shelf| {
                shelf.height >= padded_height && shelf.cursor_x + padded_width <= atlas_width
            })
            .min_by_key(|shelf| shelf.height);

        if let Some(shelf) = best {
            let x = shelf.cursor_x;
            shelf.cursor_x += padded_width;
            return Some(Point2D::new(x, shelf.y));
        }

        if self.next_shelf_y + padded_height > self.size.height {
            return None;
        }

        let y = self.next_shelf_y;
        self.next_shelf_y += padded_height;
        self.shelves.push(Shelf {
            y,
            height: padded_height,
            cursor_x: padded_width,
        });
        Some(Point2D::new(0, y))
    }

    fn mark_dirty(&mut self, rect: PixelRect) {
        self.dirty = Some(match self.dirty {
            Some(dirty) => dirty.union(&rect),
            None => rect,
        });
    }
}

impl GlyphStore for ShelfGlyphStore {
    fn size(&self) -> Size {
        self.size
    }

    fn validate_texture(&mut self) -> Option<PixelRect> {
        self.dirty.take()
    }

    fn texture_data(&self) -> (&[u8], Size) {
        (&self.pixels, self.size)
    }

    fn reset_atlas(&mut self, size: Size) {
        self.size = size;
        self.pixels.clear();
        self.pixels.resize(Self::pixel_count(size), 0);
        self.shelves.clear();
        self.next_shelf_y = 0;
        self.placements.clear();
        self.dirty = None;
    }
}

impl GlyphPacker for ShelfGlyphStore {
    fn get(&self, glyph_id: &GlyphId) -> Option<GlyphPlacement> {
        self.placements.get(glyph_id).copied()
    }

    fn insert(&mut self, glyph_id: GlyphId, glyph: &RasterizedGlyph) -> Option<GlyphPlacement> {
        if let Some(placement) = self.placements.get(&glyph_id) {
            return Some(*placement);
        }

        let width = glyph.width as u32;
        let height = glyph.height as u32;

        // blank glyphs (spaces) take no atlas space
        if width == 0 || height == 0 {
            let placement = GlyphPlacement {
                rect: Box2D::zero(),
                xmin: glyph.xmin,
                ymin: glyph.ymin,
            };
            self.placements.insert(glyph_id, placement);
            return Some(placement);
        }

        let origin = self.allocate(width, height)?;
        let atlas_width = self.size.width as usize;
        for row in 0..glyph.height {
            let src_start = row * glyph.width;
            let src_end = src_start + glyph.width;
            let dst_start = (origin.y as usize + row) * atlas_width + origin.x as usize;
            let dst_end = dst_start + glyph.width;
            if src_end <= glyph.coverage.len() && dst_end <= self.pixels.len() {
                self.pixels[dst_start..dst_end].copy_from_slice(&glyph.coverage[src_start..src_end]);
            }
        }

        let rect = Box2D::new(origin, Point2D::new(origin.x + width, origin.y + height));
        self.mark_dirty(rect);

        let placement = GlyphPlacement {
            rect,
            xmin: glyph.xmin,
            ymin: glyph.ymin,
        };
        self.placements.insert(glyph_id, placement);
        Some(placement)
    }
}
