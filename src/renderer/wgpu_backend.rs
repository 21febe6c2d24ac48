use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;

use crate::atlas::{PixelRect, Size};
use crate::paint::{CompositeOperationState, Paint, Scissor, Vertex};

use super::{DrawCall, ImageFlags, TextureBackend, TextureId, TextureKind};

struct WgpuTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    kind: TextureKind,
    size: Size,
}

/// [`TextureBackend`] storing textures on the GPU.
///
/// Uploads go through [`wgpu::Queue::write_texture`]. Triangle submissions
/// are recorded as [`DrawCall`]s; the host's render pass drains them with
/// [`take_draw_calls`](Self::take_draw_calls) and binds
/// [`texture_view`](Self::texture_view) for the paint's image.
pub struct WgpuTextureBackend {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    textures: HashMap<TextureId, WgpuTexture, fxhash::FxBuildHasher>,
    next_id: u32,
    draw_calls: Vec<DrawCall>,
}

impl WgpuTextureBackend {
    pub fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>) -> Self {
        Self {
            device,
            queue,
            textures: HashMap::with_hasher(fxhash::FxBuildHasher::default()),
            next_id: 0,
            draw_calls: Vec::new(),
        }
    }

    pub fn device(&self) -> &Arc<wgpu::Device> {
        &self.device
    }

    pub fn texture_view(&self, id: TextureId) -> Option<&wgpu::TextureView> {
        self.textures.get(&id).map(|texture| &texture.view)
    }

    pub fn take_draw_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.draw_calls)
    }

    fn format(kind: TextureKind) -> wgpu::TextureFormat {
        match kind {
            TextureKind::Alpha => wgpu::TextureFormat::R8Unorm,
            TextureKind::Rgba => wgpu::TextureFormat::Rgba8Unorm,
        }
    }

    fn write(&self, texture: &WgpuTexture, region: PixelRect, data: &[u8]) {
        let bpp = texture.kind.bytes_per_pixel() as u32;
        let stride = texture.size.width * bpp;
        let width = region.width();
        let height = region.height();

        let offset = region.min.y as u64 * stride as u64 + region.min.x as u64 * bpp as u64;
        let required = offset + (height.saturating_sub(1) as u64) * stride as u64 + (width * bpp) as u64;
        if required > data.len() as u64 {
            log::warn!(
                "Texture update of {}x{} needs {} bytes, got {}.",
                width,
                height,
                required,
                data.len()
            );
            return;
        }

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture.texture,
                mip_level: 0,
                origin: wgpu::Origin3d {
                    x: region.min.x,
                    y: region.min.y,
                    z: 0,
                },
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset,
                bytes_per_row: Some(stride),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
    }
}

impl TextureBackend for WgpuTextureBackend {
    fn create_texture(
        &mut self,
        kind: TextureKind,
        size: Size,
        _flags: ImageFlags,
        data: Option<&[u8]>,
    ) -> Option<TextureId> {
        if size.is_empty() {
            return None;
        }
        let max = self.device.limits().max_texture_dimension_2d;
        if size.width > max || size.height > max {
            log::warn!(
                "Texture {}x{} exceeds device limit of {}px.",
                size.width,
                size.height,
                max
            );
            return None;
        }

        self.next_id = self.next_id.checked_add(1)?;
        let id = TextureId::new(NonZeroU32::new(self.next_id)?);

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Font Atlas"),
            size: wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::format(kind),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let texture = WgpuTexture {
            texture,
            view,
            kind,
            size,
        };

        if let Some(data) = data {
            self.write(&texture, PixelRect::from_size(size), data);
        }

        self.textures.insert(id, texture);
        Some(id)
    }

    fn update_texture(&mut self, id: TextureId, region: PixelRect, data: &[u8]) {
        let Some(texture) = self.textures.get(&id) else {
            log::warn!("Update of unknown texture {:?}.", id);
            return;
        };

        let region = region.intersection_unchecked(&PixelRect::from_size(texture.size));
        if region.is_empty() {
            return;
        }
        self.write(texture, region, data);
    }

    fn delete_texture(&mut self, id: TextureId) {
        match self.textures.remove(&id) {
            Some(texture) => texture.texture.destroy(),
            None => log::warn!("Delete of unknown texture {:?}.", id),
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
