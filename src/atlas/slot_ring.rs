use crate::config::MAX_ATLASES;
use crate::renderer::{TextureBackend, TextureId};

use super::Size;

/// Next atlas size after `current` fills up.
///
/// The shorter side doubles (the width when both are equal). If the result
/// crosses `max_size` on either axis the atlas becomes a `max_size` square.
pub fn grown_size(current: Size, max_size: u32) -> Size {
    let mut size = current;
    if size.width > size.height {
        size.height = size.height.saturating_mul(2);
    } else {
        size.width = size.width.saturating_mul(2);
    }

    if size.width > max_size || size.height > max_size {
        size = Size::new(max_size, max_size);
    }
    size
}

/// Fixed set of atlas texture generations with a cursor.
///
/// Slot 0 is the primary atlas. `current` names the slot glyphs are packed
/// into; it only moves forward between two [`pack`](Self::pack) calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRing {
    slots: [Option<TextureId>; MAX_ATLASES],
    current: usize,
}

impl SlotRing {
    /// A ring whose primary slot holds `primary`.
    pub fn new(primary: TextureId) -> Self {
        let mut slots = [None; MAX_ATLASES];
        slots[0] = Some(primary);
        Self { slots, current: 0 }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn current_texture(&self) -> Option<TextureId> {
        self.slots[self.current]
    }

    pub fn slot(&self, index: usize) -> Option<TextureId> {
        self.slots.get(index).copied().flatten()
    }

    pub fn slots(&self) -> &[Option<TextureId>; MAX_ATLASES] {
        &self.slots
    }

    /// Whether the cursor already sits on the last slot.
    pub fn is_exhausted(&self) -> bool {
        self.current + 1 >= MAX_ATLASES
    }

    /// Texture parked in the slot after the cursor, if any.
    pub(crate) fn next_texture(&self) -> Option<TextureId> {
        self.slot(self.current + 1)
    }

    /// Empties the slot after the cursor, returning what was parked there.
    pub(crate) fn take_next(&mut self) -> Option<TextureId> {
        self.slots.get_mut(self.current + 1)?.take()
    }

    /// Stores `texture` after the cursor and moves the cursor onto it.
    pub(crate) fn advance(&mut self, texture: TextureId) {
        debug_assert!(!self.is_exhausted(), "advance past the last atlas slot");
        self.current += 1;
        self.slots[self.current] = Some(texture);
    }

    /// Folds the ring back onto slot 0.
    ///
    /// The texture at the cursor (the newest, and largest, atlas) becomes the
    /// primary. Every other texture smaller than it on either axis is deleted
    /// through `backend`; the rest keep their relative order behind the
    /// primary, except that the first survivor moves to the back. Returns the
    /// number of occupied slots afterwards.
    pub fn pack(&mut self, backend: &mut impl TextureBackend) -> usize {
        if self.current == 0 {
            return self.occupied();
        }
        let Some(newest) = self.slots[self.current] else {
            return self.occupied();
        };
        let newest_size = backend.texture_size(newest).unwrap_or(Size::zero());

        let mut kept: [Option<TextureId>; MAX_ATLASES] = [None; MAX_ATLASES];
        let mut kept_len = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if index == self.current {
                continue;
            }
            let Some(texture) = slot.take() else {
                continue;
            };
            // unknown sizes read as zero and are dropped with the small atlases
            let size = backend.texture_size(texture).unwrap_or(Size::zero());
            if size.width < newest_size.width || size.height < newest_size.height {
                log::debug!(
                    "Deleting obsolete font atlas {:?} ({}x{}).",
                    texture,
                    size.width,
                    size.height
                );
                backend.delete_texture(texture);
            } else {
                kept[kept_len] = Some(texture);
                kept_len += 1;
            }
        }

        self.slots = [None; MAX_ATLASES];
        self.slots[0] = Some(newest);
        if kept_len > 0 {
            self.slots[1..kept_len].copy_from_slice(&kept[1..kept_len]);
            self.slots[kept_len] = kept[0];
        }
        self.current = 0;

        kept_len + 1
    }

    /// Removes every texture, deleting it through `backend`.
    pub fn clear(&mut self, backend: &mut impl TextureBackend) {
        for slot in &mut self.slots {
            if let Some(texture) = slot.take() {
                backend.delete_texture(texture);
            }
        }
        self.current = 0;
    }

    fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{CpuTextureBackend, ImageFlags, TextureKind};

    fn texture(backend: &mut CpuTextureBackend, width: u32, height: u32) -> TextureId {
        backend
            .create_texture(
                TextureKind::Alpha,
                Size::new(width, height),
                ImageFlags::NONE,
                None,
            )
            .unwrap()
    }

    #[test]
    fn growth_doubles_the_short_side() {
        assert_eq!(grown_size(Size::new(1024, 512), 2048), Size::new(1024, 1024));
        assert_eq!(grown_size(Size::new(512, 512), 2048), Size::new(1024, 512));
        assert_eq!(grown_size(Size::new(512, 1024), 2048), Size::new(1024, 1024));
    }

    #[test]
    fn growth_snaps_to_max_square() {
        assert_eq!(grown_size(Size::new(2048, 2048), 2048), Size::new(2048, 2048));
        assert_eq!(grown_size(Size::new(2048, 1536), 2048), Size::new(2048, 2048));
        assert_eq!(grown_size(Size::new(1536, 1024), 2048), Size::new(2048, 2048));
    }

    #[test]
    fn pack_without_growth_is_noop() {
        let mut backend = CpuTextureBackend::new();
        let primary = texture(&mut backend, 512, 512);
        let mut ring = SlotRing::new(primary);
        let before = ring.clone();

        assert_eq!(ring.pack(&mut backend), 1);
        assert_eq!(ring, before);
        assert_eq!(backend.texture_count(), 1);
    }

    #[test]
    fn pack_deletes_smaller_atlases() {
        let mut backend = CpuTextureBackend::new();
        let a = texture(&mut backend, 512, 512);
        let b = texture(&mut backend, 1024, 512);
        let c = texture(&mut backend, 1024, 1024);

        let mut ring = SlotRing::new(a);
        ring.advance(b);
        ring.advance(c);
        assert_eq!(ring.current(), 2);

        assert_eq!(ring.pack(&mut backend), 1);
        assert_eq!(ring.slots(), &[Some(c), None, None, None]);
        assert_eq!(ring.current(), 0);
        assert_eq!(backend.texture_size(a), None);
        assert_eq!(backend.texture_size(b), None);
        assert_eq!(backend.texture_count(), 1);
    }

    #[test]
    fn pack_keeps_equal_atlases_with_primary_last() {
        let mut backend = CpuTextureBackend::new();
        let a = texture(&mut backend, 2048, 2048);
        let b = texture(&mut backend, 2048, 2048);
        let c = texture(&mut backend, 2048, 2048);

        let mut ring = SlotRing::new(a);
        ring.advance(b);
        ring.advance(c);

        assert_eq!(ring.pack(&mut backend), 3);
        assert_eq!(ring.slots(), &[Some(c), Some(b), Some(a), None]);
        assert_eq!(backend.texture_count(), 3);
    }

    #[test]
    fn pack_mixed_sizes() {
        let mut backend = CpuTextureBackend::new();
        let a = texture(&mut backend, 2048, 2048);
        let b = texture(&mut backend, 1024, 2048);
        let c = texture(&mut backend, 2048, 2048);
        let d = texture(&mut backend, 2048, 2048);

        let mut ring = SlotRing::new(a);
        ring.advance(b);
        ring.advance(c);
        ring.advance(d);
        assert!(ring.is_exhausted());

        assert_eq!(ring.pack(&mut backend), 3);
        assert_eq!(ring.slots(), &[Some(d), Some(c), Some(a), None]);
        assert_eq!(backend.texture_size(b), None);
    }

    #[test]
    fn pack_keeps_parked_textures_behind_cursor() {
        let mut backend = CpuTextureBackend::new();
        let a = texture(&mut backend, 2048, 2048);
        let b = texture(&mut backend, 2048, 2048);
        let c = texture(&mut backend, 2048, 2048);

        let mut ring = SlotRing::new(a);
        ring.advance(b);
        ring.advance(c);
        ring.pack(&mut backend);
        // [c, b, a]; reuse b as the next generation
        ring.current = 1;

        assert_eq!(ring.pack(&mut backend), 3);
        assert_eq!(ring.slots(), &[Some(b), Some(a), Some(c), None]);
        assert_eq!(backend.texture_count(), 3);
    }

    #[test]
    fn clear_deletes_every_texture() {
        let mut backend = CpuTextureBackend::new();
        let a = texture(&mut backend, 512, 512);
        let b = texture(&mut backend, 1024, 512);
        let mut ring = SlotRing::new(a);
        ring.advance(b);

        ring.clear(&mut backend);
        assert_eq!(ring.slots(), &[None; MAX_ATLASES]);
        assert_eq!(backend.texture_count(), 0);

        // second clear has nothing left to release
        ring.clear(&mut backend);
        assert_eq!(backend.texture_count(), 0);
    }
}

/// Property tests for ring compaction.
///
/// Kept at the top level: `proptest!` misbehaves nested in another test module
/// under edition 2024.
#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod slot_ring_proptests {
    use proptest::prelude::*;

    use super::*;
    use crate::renderer::{CpuTextureBackend, ImageFlags, TextureKind};

    fn arb_sizes() -> impl Strategy<Value = Vec<(u32, u32)>> {
        prop::collection::vec((1u32..=4, 1u32..=4), MAX_ATLASES)
    }

    proptest! {
        #[test]
        fn pack_folds_onto_newest(
            cursor in 1..MAX_ATLASES,
            sizes in arb_sizes(),
            parked in prop::collection::vec(any::<bool>(), MAX_ATLASES),
        ) {
            let mut backend = CpuTextureBackend::new();
            let mut slots = [None; MAX_ATLASES];
            for (index, &(width, height)) in sizes.iter().enumerate() {
                if index <= cursor || parked[index] {
                    slots[index] = backend.create_texture(
                        TextureKind::Alpha,
                        Size::new(width, height),
                        ImageFlags::NONE,
                        None,
                    );
                }
            }
            let before = slots;
            let newest = slots[cursor].unwrap();
            let newest_size = backend.texture_size(newest).unwrap();

            let mut ring = SlotRing { slots, current: cursor };
            let occupied = ring.pack(&mut backend);

            prop_assert_eq!(ring.current(), 0);
            prop_assert_eq!(ring.slot(0), Some(newest));
            for index in 0..MAX_ATLASES {
                prop_assert_eq!(ring.slot(index).is_some(), index < occupied);
            }

            for (index, texture) in before.iter().enumerate() {
                let Some(texture) = *texture else { continue };
                if index == cursor {
                    continue;
                }
                let (width, height) = sizes[index];
                let smaller = width < newest_size.width || height < newest_size.height;
                prop_assert_eq!(ring.slots().contains(&Some(texture)), !smaller);
                prop_assert_eq!(backend.texture_size(texture).is_some(), !smaller);
            }
            prop_assert_eq!(backend.texture_count(), occupied);
        }

        #[test]
        fn growth_never_exceeds_max(
            width in 1u32..=4096,
            height in 1u32..=4096,
            max in 1u32..=4096,
        ) {
            let grown = grown_size(Size::new(width, height), max);
            prop_assert!(grown.width <= max && grown.height <= max);
        }
    }
}
