use std::{collections::HashMap, path::PathBuf, sync::Arc};

use crate::glyph_id::GlyphId;

/// Coverage bitmap of one glyph, ready to be packed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterizedGlyph {
    pub width: usize,
    pub height: usize,
    /// Offset from the pen position to the left edge of the bitmap.
    pub xmin: i32,
    /// Offset from the baseline to the bottom edge of the bitmap, y up.
    pub ymin: i32,
    /// `width * height` coverage bytes, row-major, top row first.
    pub coverage: Vec<u8>,
}

/// Source of glyph bitmaps for the atlas.
pub trait GlyphRasterizer {
    /// Rasterizes `glyph_id` at its pixel size.
    ///
    /// Returns `None` if the font cannot be loaded.
    fn rasterize(&mut self, glyph_id: &GlyphId) -> Option<RasterizedGlyph>;
}

/// Font database with lazily parsed faces.
///
/// `fontdb` tracks the available faces; a face is parsed into a `fontdue`
/// font the first time one of its glyphs is rasterized.
pub struct FontStorage {
    font_db: fontdb::Database,
    /// Parsed faces. Not every face in `font_db` is loaded here.
    loaded_font: HashMap<fontdb::ID, Arc<fontdue::Font>, fxhash::FxBuildHasher>,
}

impl Default for FontStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl FontStorage {
    /// Creates an empty storage.
    pub fn new() -> Self {
        Self {
            font_db: fontdb::Database::new(),
            loaded_font: HashMap::with_hasher(fxhash::FxBuildHasher::default()),
        }
    }
}

/// Loading faces into the database.
impl FontStorage {
    /// Loads a face from binary data; invalid data is ignored.
    pub fn load_font_binary(&mut self, data: impl Into<Vec<u8>>) {
        self.font_db.load_font_data(data.into());
    }

    /// Loads the faces of a font file.
    pub fn load_font_file(&mut self, path: PathBuf) -> Result<(), std::io::Error> {
        self.font_db.load_font_file(path)
    }

    /// Loads every font file under `dir`, recursively.
    pub fn load_fonts_dir(&mut self, dir: PathBuf) {
        self.font_db.load_fonts_dir(dir)
    }

    /// Loads the fonts installed on the system.
    pub fn load_system_fonts(&mut self) {
        self.font_db.load_system_fonts();
    }

    /// Removes a face and drops its parsed font.
    pub fn remove_face(&mut self, id: fontdb::ID) {
        self.font_db.remove_face(id);
        self.loaded_font.remove(&id);
    }

    /// Whether no face has been loaded.
    pub fn is_empty(&self) -> bool {
        self.font_db.is_empty()
    }

    /// Number of faces in the database.
    pub fn len(&self) -> usize {
        self.font_db.len()
    }
}

/// Face lookup.
impl FontStorage {
    /// Finds the best face for `query`.
    pub fn query(&self, query: &fontdb::Query) -> Option<fontdb::ID> {
        self.font_db.query(query)
    }

    /// Returns the parsed face, parsing it on first use.
    pub fn font(&mut self, id: fontdb::ID) -> Option<Arc<fontdue::Font>> {
        use std::collections::hash_map::Entry;

        match self.loaded_font.entry(id) {
            Entry::Occupied(entry) => Some(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let font_result = self.font_db.with_face_data(id, |data, index| {
                    fontdue::Font::from_bytes(
                        data,
                        fontdue::FontSettings {
                            collection_index: index,
                            ..Default::default()
                        },
                    )
                })?;

                match font_result {
                    Ok(font) => Some(Arc::clone(entry.insert(Arc::new(font)))),
                    Err(e) => {
                        log::error!("Failed to load font (id: {:?}): {}", id, e);
                        None
                    }
                }
            }
        }
    }
}

impl GlyphRasterizer for FontStorage {
    fn rasterize(&mut self, glyph_id: &GlyphId) -> Option<RasterizedGlyph> {
        let font = self.font(glyph_id.font_id())?;
        let (metrics, coverage) =
            font.rasterize_indexed(glyph_id.glyph_index(), glyph_id.pixel_size());

        Some(RasterizedGlyph {
            width: metrics.width,
            height: metrics.height,
            xmin: metrics.xmin,
            ymin: metrics.ymin,
            coverage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_storage_has_no_fonts() {
        let mut storage = FontStorage::new();
        assert!(storage.is_empty());
        assert_eq!(storage.len(), 0);

        let glyph = GlyphId::new(fontdb::ID::dummy(), 1, 16.0);
        assert!(storage.rasterize(&glyph).is_none());
    }

    #[test]
    fn invalid_font_data_is_ignored() {
        let mut storage = FontStorage::new();
        storage.load_font_binary(vec![0u8; 16]);
        assert!(storage.is_empty());
    }
}
