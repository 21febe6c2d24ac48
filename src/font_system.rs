use std::path::PathBuf;

use parking_lot::Mutex;

use crate::{
    config::AtlasConfig,
    error::AtlasResult,
    font_storage::FontStorage,
    frame_stats::DrawCounts,
    glyph_id::PositionedGlyph,
    renderer::TextureBackend,
    state::DrawState,
    text::TextRenderer,
};

/// High-level entry point: fonts plus an atlas-backed text renderer.
///
/// Both halves sit behind a `Mutex` so the system can be shared between
/// threads, which is common in UI frameworks. Methods that need both lock the
/// font storage first.
///
/// The fields are public to allow direct access when the forwarding methods
/// are not enough.
pub struct FontSystem<B: TextureBackend> {
    /// The underlying font storage.
    pub font_storage: Mutex<FontStorage>,
    /// The text renderer and its backend.
    pub renderer: Mutex<TextRenderer<B>>,
}

impl<B: TextureBackend> FontSystem<B> {
    /// Creates a font system with empty storage, rendering through `backend`.
    pub fn new(backend: B, config: AtlasConfig) -> AtlasResult<Self> {
        Ok(Self {
            font_storage: Mutex::new(FontStorage::new()),
            renderer: Mutex::new(TextRenderer::new(backend, config)?),
        })
    }
}

/// font storage initialization
impl<B: TextureBackend> FontSystem<B> {
    /// Loads the system fonts into the storage.
    pub fn load_system_fonts(&self) {
        self.font_storage.lock().load_system_fonts();
    }

    /// Loads a font from binary data.
    pub fn load_font_binary(&self, data: impl Into<Vec<u8>>) {
        self.font_storage.lock().load_font_binary(data);
    }

    /// Loads a font from a file path.
    pub fn load_font_file(&self, path: PathBuf) -> Result<(), std::io::Error> {
        self.font_storage.lock().load_font_file(path)
    }

    /// Loads all fonts from a directory.
    pub fn load_fonts_dir(&self, dir: PathBuf) {
        self.font_storage.lock().load_fonts_dir(dir)
    }

    /// Removes a face by ID.
    pub fn remove_face(&self, id: fontdb::ID) {
        self.font_storage.lock().remove_face(id);
    }

    /// Finds the best face for `query`.
    pub fn query(&self, query: &fontdb::Query) -> Option<fontdb::ID> {
        self.font_storage.lock().query(query)
    }

    /// Checks if the storage is empty.
    pub fn is_empty(&self) -> bool {
        self.font_storage.lock().is_empty()
    }
}

/// frame
impl<B: TextureBackend> FontSystem<B> {
    /// See [`TextRenderer::begin_frame`].
    pub fn begin_frame(&self, device_px_ratio: f32) {
        self.renderer.lock().begin_frame(device_px_ratio);
    }

    /// Draws glyphs from faces in this system's storage.
    pub fn draw_glyphs(
        &self,
        state: &DrawState,
        font_size: f32,
        glyphs: &[PositionedGlyph],
    ) -> DrawCounts {
        let mut font_storage = self.font_storage.lock();
        self.renderer
            .lock()
            .draw_glyphs(state, font_size, glyphs, &mut *font_storage)
    }

    /// See [`TextRenderer::end_frame`].
    pub fn end_frame(&self) -> DrawCounts {
        self.renderer.lock().end_frame()
    }

    /// Runs `f` with exclusive access to the backend, e.g. to drain draw calls.
    pub fn with_backend<R>(&self, f: impl FnOnce(&mut B) -> R) -> R {
        f(self.renderer.lock().backend_mut())
    }
}
