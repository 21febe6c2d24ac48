//! The slice of drawing state text submission reads.

use euclid::{Transform2D, UnknownUnit};

use crate::paint::{CompositeOperation, CompositeOperationState, Paint, Scissor};

pub type Transform = Transform2D<f32, UnknownUnit, UnknownUnit>;

/// Upper bound for the glyph rasterization scale.
pub const MAX_FONT_SCALE: f32 = 4.0;

/// Font scales are snapped to multiples of this step.
pub const FONT_SCALE_STEP: f32 = 0.01;

/// Current drawing state as seen by text rendering.
///
/// The owner of the state stack keeps one of these per saved level and hands
/// the top one to [`TextRenderer::draw_glyphs`](crate::text::TextRenderer::draw_glyphs).
#[derive(Clone, Debug, PartialEq)]
pub struct DrawState {
    pub transform: Transform,
    pub fill: Paint,
    /// Global alpha, multiplied into every paint.
    pub alpha: f32,
    pub composite_operation: CompositeOperationState,
    pub scissor: Scissor,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Transform::identity(),
            fill: Paint::default(),
            alpha: 1.0,
            composite_operation: CompositeOperation::SourceOver.into(),
            scissor: Scissor::default(),
        }
    }
}

/// Tolerances derived from the device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelRatio {
    pub tess_tol: f32,
    pub dist_tol: f32,
    /// Width of the anti-aliasing fringe in user units.
    pub fringe_width: f32,
    pub device_px_ratio: f32,
}

impl PixelRatio {
    pub fn new(ratio: f32) -> Self {
        Self {
            tess_tol: 0.25 / ratio,
            dist_tol: 0.01 / ratio,
            fringe_width: 1.0 / ratio,
            device_px_ratio: ratio,
        }
    }
}

impl Default for PixelRatio {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Mean length of the transform's two basis vectors.
pub fn average_scale(t: &Transform) -> f32 {
    let sx = (t.m11 * t.m11 + t.m21 * t.m21).sqrt();
    let sy = (t.m12 * t.m12 + t.m22 * t.m22).sqrt();
    (sx + sy) * 0.5
}

/// Rounds `a` to the nearest multiple of `d`.
pub fn quantize(a: f32, d: f32) -> f32 {
    (a / d + 0.5).floor() * d
}

/// Glyph rasterization scale for `transform`.
///
/// Snapping keeps near-identical zoom levels on the same cached glyphs, and
/// the clamp bounds atlas usage under extreme zoom.
pub fn font_scale(transform: &Transform) -> f32 {
    quantize(average_scale(transform), FONT_SCALE_STEP).min(MAX_FONT_SCALE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn identity_scale_is_one() {
        assert!(approx(font_scale(&Transform::identity()), 1.0));
    }

    #[test]
    fn scale_is_quantized_to_hundredths() {
        let t = Transform::scale(0.2345, 0.2345);
        assert!(approx(font_scale(&t), 0.23));

        let t = Transform::scale(1.006, 1.006);
        assert!(approx(font_scale(&t), 1.01));
    }

    #[test]
    fn scale_is_clamped() {
        let t = Transform::scale(137.0, 137.0);
        assert_eq!(font_scale(&t), MAX_FONT_SCALE);
    }

    #[test]
    fn rotation_does_not_change_scale() {
        let t = Transform::rotation(euclid::Angle::degrees(30.0)).then_scale(2.0, 2.0);
        assert!(approx(font_scale(&t), 2.0));
    }

    #[test]
    fn anisotropic_scale_is_averaged() {
        let t = Transform::scale(1.0, 3.0);
        assert!(approx(average_scale(&t), 2.0));
    }

    #[test]
    fn pixel_ratio_fringe() {
        let ratio = PixelRatio::new(2.0);
        assert!(approx(ratio.fringe_width, 0.5));
        assert!(approx(ratio.tess_tol, 0.125));
    }
}

/// Property tests for scale quantization.
///
/// Kept at the top level: `proptest!` misbehaves nested in another test module
/// under edition 2024.
#[cfg(test)]
mod state_proptests {
    use euclid::Angle;
    use proptest::prelude::*;

    use super::*;

    fn arb_transform() -> impl Strategy<Value = Transform> {
        (
            0.0f32..1000.0,
            0.0f32..1000.0,
            -10.0f32..10.0,
            -10.0f32..10.0,
            -std::f32::consts::PI..std::f32::consts::PI,
        )
            .prop_map(|(sx, sy, skew_x, skew_y, angle)| {
                Transform::scale(sx, sy)
                    .then(&Transform::new(1.0, skew_y, skew_x, 1.0, 0.0, 0.0))
                    .then_rotate(Angle::radians(angle))
            })
    }

    proptest! {
        #[test]
        fn font_scale_is_bounded(t in arb_transform()) {
            let scale = font_scale(&t);
            prop_assert!(scale >= 0.0);
            prop_assert!(scale <= MAX_FONT_SCALE);
        }

        #[test]
        fn font_scale_is_quantized(t in arb_transform()) {
            let hundredths = font_scale(&t) / FONT_SCALE_STEP;
            prop_assert!((hundredths - hundredths.round()).abs() < 1e-2);
        }

        #[test]
        fn font_scale_tracks_clamped_average(t in arb_transform()) {
            let expected = average_scale(&t).min(MAX_FONT_SCALE);
            prop_assert!((font_scale(&t) - expected).abs() <= FONT_SCALE_STEP * 0.5 + 1e-4);
        }
    }
}
