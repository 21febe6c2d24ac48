//! Paint, blending and vertex types handed to the renderer backend.

use euclid::{Size2D, UnknownUnit};

use crate::renderer::TextureId;
use crate::state::Transform;

/// Straight-alpha RGBA color with components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Builds a color from 8-bit channels.
    pub fn rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Fill description consumed by the backend's triangle submission.
///
/// A paint is a gradient between `inner_color` and `outer_color` shaped by
/// `extent`, `radius` and `feather`, optionally modulated by a texture.
/// Solid colors use the same color for both ends.
#[derive(Clone, Debug, PartialEq)]
pub struct Paint {
    pub transform: Transform,
    pub extent: Size2D<f32, UnknownUnit>,
    pub radius: f32,
    pub feather: f32,
    pub inner_color: Color,
    pub outer_color: Color,
    pub image: Option<TextureId>,
}

impl Paint {
    /// A single-color paint.
    pub fn color(color: Color) -> Self {
        Self {
            transform: Transform::identity(),
            extent: Size2D::zero(),
            radius: 0.0,
            feather: 1.0,
            inner_color: color,
            outer_color: color,
            image: None,
        }
    }

    /// Copies `fill` and binds it to a glyph atlas texture.
    pub fn for_text(image: Option<TextureId>, fill: &Paint) -> Self {
        Self {
            image,
            ..fill.clone()
        }
    }

    /// Scales both gradient colors' alpha by `alpha`.
    pub fn premultiply_alpha(&mut self, alpha: f32) {
        self.inner_color.a *= alpha;
        self.outer_color.a *= alpha;
    }
}

impl Default for Paint {
    fn default() -> Self {
        Self::color(Color::BLACK)
    }
}

/// Porter-Duff style composite operations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CompositeOperation {
    #[default]
    SourceOver,
    SourceIn,
    SourceOut,
    Atop,
    DestinationOver,
    DestinationIn,
    DestinationOut,
    DestinationAtop,
    Lighter,
    Copy,
    Xor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    SrcAlphaSaturate,
}

/// Blend factors for the color and alpha channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CompositeOperationState {
    pub src_rgb: BlendFactor,
    pub dst_rgb: BlendFactor,
    pub src_alpha: BlendFactor,
    pub dst_alpha: BlendFactor,
}

impl CompositeOperationState {
    fn uniform(src: BlendFactor, dst: BlendFactor) -> Self {
        Self {
            src_rgb: src,
            dst_rgb: dst,
            src_alpha: src,
            dst_alpha: dst,
        }
    }
}

impl From<CompositeOperation> for CompositeOperationState {
    fn from(op: CompositeOperation) -> Self {
        use BlendFactor::*;

        let (src, dst) = match op {
            CompositeOperation::SourceOver => (One, OneMinusSrcAlpha),
            CompositeOperation::SourceIn => (DstAlpha, Zero),
            CompositeOperation::SourceOut => (OneMinusDstAlpha, Zero),
            CompositeOperation::Atop => (DstAlpha, OneMinusSrcAlpha),
            CompositeOperation::DestinationOver => (OneMinusDstAlpha, One),
            CompositeOperation::DestinationIn => (Zero, SrcAlpha),
            CompositeOperation::DestinationOut => (Zero, OneMinusSrcAlpha),
            CompositeOperation::DestinationAtop => (OneMinusDstAlpha, SrcAlpha),
            CompositeOperation::Lighter => (One, One),
            CompositeOperation::Copy => (One, Zero),
            CompositeOperation::Xor => (OneMinusDstAlpha, OneMinusSrcAlpha),
        };
        Self::uniform(src, dst)
    }
}

impl Default for CompositeOperationState {
    fn default() -> Self {
        CompositeOperation::default().into()
    }
}

/// Clip rectangle in its own coordinate frame.
///
/// `extent` holds the half-size of the rectangle; `None` disables scissoring.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scissor {
    pub transform: Transform,
    pub extent: Option<Size2D<f32, UnknownUnit>>,
}

impl Scissor {
    pub fn is_enabled(&self) -> bool {
        self.extent.is_some()
    }
}

/// A position with texture coordinates, laid out for direct upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "wgpu", derive(bytemuck::Pod, bytemuck::Zeroable))]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub u: f32,
    pub v: f32,
}

impl Vertex {
    pub const fn new(x: f32, y: f32, u: f32, v: f32) -> Self {
        Self { x, y, u, v }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroU32;

    #[test]
    fn text_paint_keeps_fill_and_binds_image() {
        let mut fill = Paint::color(Color::rgba(1.0, 0.5, 0.25, 0.8));
        fill.radius = 3.0;
        let image = NonZeroU32::new(7).map(TextureId::new);

        let paint = Paint::for_text(image, &fill);
        assert_eq!(paint.image, image);
        assert_eq!(paint.radius, 3.0);
        assert_eq!(paint.inner_color, fill.inner_color);
    }

    #[test]
    fn premultiply_scales_both_colors() {
        let mut paint = Paint::color(Color::rgba(1.0, 1.0, 1.0, 0.5));
        paint.outer_color.a = 1.0;
        paint.premultiply_alpha(0.5);
        assert_eq!(paint.inner_color.a, 0.25);
        assert_eq!(paint.outer_color.a, 0.5);
        // color channels untouched
        assert_eq!(paint.inner_color.r, 1.0);
    }

    #[test]
    fn composite_operation_blend_factors() {
        let state = CompositeOperationState::from(CompositeOperation::SourceOver);
        assert_eq!(state.src_rgb, BlendFactor::One);
        assert_eq!(state.dst_rgb, BlendFactor::OneMinusSrcAlpha);
        assert_eq!(state.src_alpha, state.src_rgb);

        let xor = CompositeOperationState::from(CompositeOperation::Xor);
        assert_eq!(xor.src_rgb, BlendFactor::OneMinusDstAlpha);
        assert_eq!(xor.dst_alpha, BlendFactor::OneMinusSrcAlpha);
    }

    #[test]
    fn default_scissor_is_disabled() {
        assert!(!Scissor::default().is_enabled());
    }
}
