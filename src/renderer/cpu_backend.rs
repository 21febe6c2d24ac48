use std::collections::HashMap;
use std::num::NonZeroU32;

use crate::atlas::{PixelRect, Size};
use crate::paint::{CompositeOperationState, Paint, Scissor, Vertex};

use super::{DrawCall, ImageFlags, TextureBackend, TextureId, TextureKind};

/// Texture living in system memory.
pub struct CpuTexture {
    pub kind: TextureKind,
    pub size: Size,
    pub flags: ImageFlags,
    /// Row-major pixels, `size.width * bpp` bytes per row.
    pub pixels: Vec<u8>,
}

/// In-memory [`TextureBackend`].
///
/// Textures are plain byte buffers and triangle submissions are recorded as
/// [`DrawCall`]s, to be consumed by a software rasterizer or inspected
/// directly.
pub struct CpuTextureBackend {
    textures: HashMap<TextureId, CpuTexture, fxhash::FxBuildHasher>,
    next_id: u32,
    max_texture_size: Option<u32>,
    draw_calls: Vec<DrawCall>,
}

impl Default for CpuTextureBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuTextureBackend {
    pub fn new() -> Self {
        Self {
            textures: HashMap::with_hasher(fxhash::FxBuildHasher::default()),
            next_id: 0,
            max_texture_size: None,
            draw_calls: Vec::new(),
        }
    }

    /// Refuses to create textures larger than `max` on either side,
    /// mirroring a GPU's texture size limit.
    pub fn with_max_texture_size(max: u32) -> Self {
        Self {
            max_texture_size: Some(max),
            ..Self::new()
        }
    }

    pub fn texture(&self, id: TextureId) -> Option<&CpuTexture> {
        self.textures.get(&id)
    }

    /// Number of live textures.
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draw_calls
    }

    /// Drains the recorded submissions, typically once per frame.
    pub fn take_draw_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.draw_calls)
    }

    fn allocate_id(&mut self) -> Option<TextureId> {
        self.next_id = self.next_id.checked_add(1)?;
        NonZeroU32::new(self.next_id).map(TextureId::new)
    }
}

impl TextureBackend for CpuTextureBackend {
    fn create_texture(
        &mut self,
        kind: TextureKind,
        size: Size,
        flags: ImageFlags,
        data: Option<&[u8]>,
    ) -> Option<TextureId> {
        if size.is_empty() {
            return None;
        }
        if let Some(max) = self.max_texture_size {
            if size.width > max || size.height > max {
                log::warn!(
                    "Texture {}x{} exceeds backend limit of {}px.",
                    size.width,
                    size.height,
                    max
                );
                return None;
            }
        }

        let len = (size.width as usize)
            .saturating_mul(size.height as usize)
            .saturating_mul(kind.bytes_per_pixel());
        let mut pixels = vec![0; len];
        if let Some(data) = data {
            let copy_len = data.len().min(len);
            pixels[..copy_len].copy_from_slice(&data[..copy_len]);
        }

        let id = self.allocate_id()?;
        self.textures.insert(
            id,
            CpuTexture {
                kind,
                size,
                flags,
                pixels,
            },
        );
        Some(id)
    }

    fn update_texture(&mut self, id: TextureId, region: PixelRect, data: &[u8]) {
        let Some(texture) = self.textures.get_mut(&id) else {
            log::warn!("Update of unknown texture {:?}.", id);
            return;
        };

        let bpp = texture.kind.bytes_per_pixel();
        let stride = texture.size.width as usize * bpp;
        let x_max = region.max.x.min(texture.size.width) as usize;
        let y_max = region.max.y.min(texture.size.height) as usize;
        let x_min = region.min.x as usize;

        if x_min >= x_max {
            return;
        }

        for row in region.min.y as usize..y_max {
            let start = row * stride + x_min * bpp;
            let end = row * stride + x_max * bpp;
            if end <= data.len() && end <= texture.pixels.len() {
                texture.pixels[start..end].copy_from_slice(&data[start..end]);
            }
        }
    }

    fn delete_texture(&mut self, id: TextureId) {
        if self.textures.remove(&id).is_none() {
            log::warn!("Delete of unknown texture {:?}.", id);
        }
    }

    fn texture_size(&self, id: TextureId) -> Option<Size> {
        self.textures.get(&id).map(|texture| texture.size)
    }

    fn triangles(
        &mut self,
        paint: &Paint,
        composite_operation: CompositeOperationState,
        scissor: &Scissor,
        vertices: &[Vertex],
        fringe_width: f32,
    ) {
        self.draw_calls.push(DrawCall {
            paint: paint.clone(),
            composite_operation,
            scissor: scissor.clone(),
            vertices: vertices.to_vec(),
            fringe_width,
        });
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use euclid::{Box2D, Point2D};

    #[test]
    fn create_and_delete() {
        let mut backend = CpuTextureBackend::new();
        let id = backend
            .create_texture(TextureKind::Alpha, Size::new(4, 2), ImageFlags::NONE, None)
            .unwrap();

        assert_eq!(backend.texture_size(id), Some(Size::new(4, 2)));
        assert_eq!(backend.texture(id).unwrap().pixels.len(), 8);

        backend.delete_texture(id);
        assert_eq!(backend.texture_size(id), None);
        assert_eq!(backend.texture_count(), 0);
    }

    #[test]
    fn ids_are_unique_and_nonzero() {
        let mut backend = CpuTextureBackend::new();
        let a = backend
            .create_texture(TextureKind::Alpha, Size::new(1, 1), ImageFlags::NONE, None)
            .unwrap();
        let b = backend
            .create_texture(TextureKind::Rgba, Size::new(1, 1), ImageFlags::NONE, None)
            .unwrap();
        assert_ne!(a, b);
        assert!(a.get() > 0 && b.get() > 0);
    }

    #[test]
    fn size_limit_rejects_creation() {
        let mut backend = CpuTextureBackend::with_max_texture_size(256);
        let id = backend.create_texture(
            TextureKind::Alpha,
            Size::new(512, 512),
            ImageFlags::NONE,
            None,
        );
        assert!(id.is_none());
        assert_eq!(backend.texture_count(), 0);
    }

    #[test]
    fn update_copies_only_the_region() {
        let mut backend = CpuTextureBackend::new();
        let id = backend
            .create_texture(TextureKind::Alpha, Size::new(4, 4), ImageFlags::NONE, None)
            .unwrap();

        let source: Vec<u8> = (1..=16).collect();
        let region = Box2D::new(Point2D::new(1, 1), Point2D::new(3, 2));
        backend.update_texture(id, region, &source);

        let pixels = &backend.texture(id).unwrap().pixels;
        #[rustfmt::skip]
        let expected = [
            0, 0, 0, 0,
            0, 6, 7, 0,
            0, 0, 0, 0,
            0, 0, 0, 0,
        ];
        assert_eq!(pixels.as_slice(), &expected);
    }

    #[test]
    fn triangles_are_recorded() {
        let mut backend = CpuTextureBackend::new();
        let vertices = [Vertex::default(); 3];
        backend.triangles(
            &Paint::default(),
            CompositeOperationState::default(),
            &Scissor::default(),
            &vertices,
            1.0,
        );

        let calls = backend.take_draw_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].vertices.len(), 3);
        assert!(backend.draw_calls().is_empty());
    }
}
