//! # nvg-font-atlas
//!
//! Font atlas lifecycle management for vector graphics renderers.
//!
//! ## Overview
//!
//! Text is drawn by packing rasterized glyphs into an alpha texture, the font
//! atlas, and emitting textured quads that sample it. This crate owns that
//! texture: it uploads only the region that changed, grows into a larger
//! texture when the current one fills up mid-frame, and at the end of the
//! frame folds the generations back so the largest atlas becomes primary.
//!
//! The core of the library is the [`FontAtlasManager`]. [`TextRenderer`]
//! drives it for a frame, and [`FontSystem`] pairs a renderer with the
//! [`FontStorage`] its glyphs come from.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use nvg_font_atlas::{AtlasConfig, CpuTextureBackend, DrawState, FontSystem, PositionedGlyph};
//!
//! // 1. Create a FontSystem over a texture backend
//! let font_system = FontSystem::new(CpuTextureBackend::new(), AtlasConfig::default()).unwrap();
//! font_system.load_system_fonts();
//!
//! // 2. Pick a face and lay out glyphs (here: one glyph per char, fixed advance)
//! let font_id = font_system
//!     .query(&nvg_font_atlas::fontdb::Query {
//!         families: &[nvg_font_atlas::fontdb::Family::SansSerif],
//!         ..Default::default()
//!     })
//!     .unwrap();
//! let font = font_system.font_storage.lock().font(font_id).unwrap();
//! let glyphs: Vec<PositionedGlyph> = "Hello"
//!     .chars()
//!     .enumerate()
//!     .map(|(i, c)| PositionedGlyph {
//!         font_id,
//!         glyph_index: font.lookup_glyph_index(c),
//!         x: 10.0 + i as f32 * 9.0,
//!         y: 24.0,
//!     })
//!     .collect();
//!
//! // 3. Draw them each frame
//! font_system.begin_frame(2.0);
//! font_system.draw_glyphs(&DrawState::default(), 16.0, &glyphs);
//! let stats = font_system.end_frame();
//!
//! // 4. Hand the recorded draw calls to the host renderer
//! let draw_calls = font_system.with_backend(|backend| backend.take_draw_calls());
//! println!("{} triangles in {} draw calls", stats.triangles, draw_calls.len());
//! ```
//!
//! ## Features
//!
//! *   **Growing atlas**: Up to four atlas generations, each at most `2048x2048`.
//! *   **Partial uploads**: Only the dirty region of the atlas is sent to the backend.
//! *   **Pluggable backend**: Any [`TextureBackend`]; an in-memory one is built in and a
//!     `wgpu` one is available behind the `wgpu` feature.
//! *   **Thread Safety**: [`FontSystem`] uses internal locking for shared use.

pub mod atlas;
pub mod config;
pub mod error;
pub mod font_storage;
pub mod font_system;
pub mod frame_stats;
pub mod glyph_id;
pub mod paint;
pub mod renderer;
pub mod state;
pub mod text;

// common re-exports
pub use atlas::{FontAtlasManager, GlyphStore, ShelfGlyphStore};
pub use config::AtlasConfig;
pub use error::{AtlasError, AtlasResult};
pub use font_storage::{FontStorage, GlyphRasterizer};
pub use font_system::FontSystem;
pub use frame_stats::{DrawCounts, FrameStats};
pub use glyph_id::{GlyphId, PositionedGlyph};
pub use paint::{Color, CompositeOperation, Paint, Vertex};
pub use renderer::{CpuTextureBackend, TextureBackend, TextureId};
#[cfg(feature = "wgpu")]
pub use renderer::WgpuTextureBackend;
pub use state::{DrawState, PixelRatio, Transform};
pub use text::TextRenderer;

// re-export dependencies
pub use euclid;
pub use fontdb;
pub use fontdue;
pub use parking_lot;

#[cfg(feature = "wgpu")]
pub use wgpu;
