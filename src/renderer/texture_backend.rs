use std::num::NonZeroU32;

use crate::atlas::{PixelRect, Size};
use crate::paint::{CompositeOperationState, Paint, Scissor, Vertex};

/// Opaque handle to a backend texture.
///
/// Handles are never zero, so `Option<TextureId>` stands in for
/// "no texture" without extra space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(NonZeroU32);

impl TextureId {
    pub const fn new(id: NonZeroU32) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

/// Pixel format of a texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureKind {
    /// One byte of coverage per pixel. Glyph atlases use this.
    Alpha,
    /// Four bytes per pixel, straight RGBA.
    Rgba,
}

impl TextureKind {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Alpha => 1,
            Self::Rgba => 4,
        }
    }
}

/// Sampling and layout flags for a texture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ImageFlags(u32);

impl ImageFlags {
    pub const NONE: Self = Self(0);
    pub const GENERATE_MIPMAPS: Self = Self(1 << 0);
    pub const REPEAT_X: Self = Self(1 << 1);
    pub const REPEAT_Y: Self = Self(1 << 2);
    pub const FLIP_Y: Self = Self(1 << 3);
    pub const PREMULTIPLIED: Self = Self(1 << 4);
    pub const NEAREST: Self = Self(1 << 5);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for ImageFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A triangle submission captured by a recording backend.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCall {
    pub paint: Paint,
    pub composite_operation: CompositeOperationState,
    pub scissor: Scissor,
    pub vertices: Vec<Vertex>,
    pub fringe_width: f32,
}

/// The slice of a renderer backend the font atlas talks to.
///
/// All calls are synchronous from the caller's point of view; a backend may
/// queue GPU work behind them. Only [`create_texture`](Self::create_texture)
/// reports failure; the others succeed or fail at the backend's discretion.
pub trait TextureBackend {
    /// Allocates a texture, optionally filled with `data`.
    ///
    /// Returns `None` when the texture cannot be created.
    fn create_texture(
        &mut self,
        kind: TextureKind,
        size: Size,
        flags: ImageFlags,
        data: Option<&[u8]>,
    ) -> Option<TextureId>;

    /// Copies `region` of `data` into the texture.
    ///
    /// `data` holds the whole texture image, rows of `width * bpp` bytes, so
    /// the region is read at the same coordinates it is written to.
    fn update_texture(&mut self, id: TextureId, region: PixelRect, data: &[u8]);

    fn delete_texture(&mut self, id: TextureId);

    /// Size of a live texture, `None` for unknown handles.
    fn texture_size(&self, id: TextureId) -> Option<Size>;

    /// Submits a filled triangle list.
    fn triangles(
        &mut self,
        paint: &Paint,
        composite_operation: CompositeOperationState,
        scissor: &Scissor,
        vertices: &[Vertex],
        fringe_width: f32,
    );
}
