pub mod cpu_backend;
mod texture_backend;
#[cfg(feature = "wgpu")]
pub mod wgpu_backend;

pub use cpu_backend::CpuTextureBackend;
pub use texture_backend::{DrawCall, ImageFlags, TextureBackend, TextureId, TextureKind};
#[cfg(feature = "wgpu")]
pub use wgpu_backend::WgpuTextureBackend;
