//! Glyph atlas generations and their texture lifecycle.
//!
//! A [`FontAtlasManager`] keeps up to [`MAX_ATLASES`](crate::config::MAX_ATLASES)
//! atlas textures alive. Glyphs are always packed into the texture at the
//! ring's cursor; when it fills up the manager moves on to a larger texture,
//! and at the end of the frame [`FontAtlasManager::pack`] folds the ring back
//! so the largest atlas becomes the primary one again.

use euclid::{Box2D, Size2D, UnknownUnit};

mod glyph_store;
mod manager;
mod slot_ring;

pub use glyph_store::{GlyphPacker, GlyphPlacement, GlyphStore, ShelfGlyphStore};
pub use manager::FontAtlasManager;
pub use slot_ring::{SlotRing, grown_size};

/// Texture or bitmap dimensions in pixels.
pub type Size = Size2D<u32, UnknownUnit>;

/// Pixel rectangle, `max` exclusive.
pub type PixelRect = Box2D<u32, UnknownUnit>;
