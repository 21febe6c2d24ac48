use std::num::NonZeroU32;

use crate::atlas::Size;
use crate::error::{AtlasError, AtlasResult};

/// Side length of the first atlas texture.
pub const INIT_FONTIMAGE_SIZE: u32 = 512;
/// Neither side of an atlas texture grows beyond this.
pub const MAX_FONTIMAGE_SIZE: u32 = 2048;
/// Number of atlas generations that can be alive at once.
pub const MAX_ATLASES: usize = 4;

/// Sizing of the font atlas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AtlasConfig {
    /// Side length of the square primary atlas created at startup.
    pub initial_size: NonZeroU32,
    /// Upper bound for both sides of any grown atlas.
    ///
    /// A doubled atlas that would cross this bound on either axis is snapped
    /// to a square of exactly this size.
    pub max_size: NonZeroU32,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            initial_size: NonZeroU32::new(INIT_FONTIMAGE_SIZE).unwrap_or(NonZeroU32::MIN),
            max_size: NonZeroU32::new(MAX_FONTIMAGE_SIZE).unwrap_or(NonZeroU32::MIN),
        }
    }
}

impl AtlasConfig {
    /// Checks that the initial atlas fits under the maximum size.
    pub fn validate(&self) -> AtlasResult<()> {
        if self.initial_size > self.max_size {
            return Err(AtlasError::InvalidConfig {
                initial: self.initial_size.get(),
                max: self.max_size.get(),
            });
        }
        Ok(())
    }

    pub(crate) fn initial_extent(&self) -> Size {
        Size::new(self.initial_size.get(), self.initial_size.get())
    }
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_reference_sizing() {
        let config = AtlasConfig::default();
        assert_eq!(config.initial_size.get(), 512);
        assert_eq!(config.max_size.get(), 2048);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn initial_larger_than_max_is_rejected() {
        let config = AtlasConfig {
            initial_size: NonZeroU32::new(4096).unwrap(),
            max_size: NonZeroU32::new(2048).unwrap(),
        };
        assert_eq!(
            config.validate(),
            Err(AtlasError::InvalidConfig {
                initial: 4096,
                max: 2048
            })
        );
    }
}
