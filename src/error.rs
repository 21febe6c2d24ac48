//! Error types for atlas management.

use thiserror::Error;

/// Errors raised while setting up the font atlas.
///
/// Running out of atlas slots is not an error: [`alloc_text_atlas`] reports it
/// as `false` and the caller drops the glyph that needed the space.
///
/// [`alloc_text_atlas`]: crate::atlas::FontAtlasManager::alloc_text_atlas
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AtlasError {
    /// The backend could not allocate the primary atlas texture.
    #[error("failed to create initial font atlas texture ({width}x{height})")]
    AtlasCreation { width: u32, height: u32 },

    /// The configured sizes are inconsistent.
    #[error("invalid atlas configuration: initial size {initial}px exceeds maximum {max}px")]
    InvalidConfig { initial: u32, max: u32 },
}

/// Result type for atlas operations.
pub type AtlasResult<T> = Result<T, AtlasError>;
