//! Cell exclusion masking.
//!
//! A [`Mask`] answers "is cell (x, y) excluded from mesh generation?".
//! It never owns raster data: the no-mask variant has no source at all,
//! and both file-mask and self-mask variants borrow a [`Heightmap`]
//! owned elsewhere. Self-mask mode therefore aliases the primary
//! heightmap as a second read-only view over the same buffer, which the
//! borrow checker keeps sound without any copy.

use crate::{Error, Heightmap, Result};

/// Threshold-based exclusion test over an optional borrowed raster.
#[derive(Clone, Copy, Debug)]
pub struct Mask<'a> {
    source: Option<&'a Heightmap>,
    threshold: u8,
    reversed: bool,
}

impl<'a> Mask<'a> {
    /// A mask that excludes nothing.
    #[inline]
    pub fn none() -> Self {
        Self {
            source: None,
            threshold: 0,
            reversed: false,
        }
    }

    /// A threshold mask over the given raster.
    ///
    /// Dark areas (samples at or below `threshold`) are excluded;
    /// `reversed` inverts the test. Pass the primary heightmap itself
    /// for self-mask mode.
    #[inline]
    pub fn over(source: &'a Heightmap, threshold: u8, reversed: bool) -> Self {
        Self {
            source: Some(source),
            threshold,
            reversed,
        }
    }

    /// Whether masking is active at all.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.source.is_some()
    }

    /// Verify this mask covers the same grid as the primary raster.
    ///
    /// A mismatched independent mask is a fatal error before any mesh
    /// generation starts.
    pub fn check_dimensions(&self, primary: &Heightmap) -> Result<()> {
        if let Some(source) = self.source {
            if !source.same_dimensions(primary) {
                return Err(Error::Validation(format!(
                    "mask dimensions {}x{} do not match heightmap dimensions {}x{}",
                    source.width(),
                    source.height(),
                    primary.width(),
                    primary.height()
                )));
            }
        }
        Ok(())
    }

    /// Whether cell (x, y) is excluded from the mesh.
    #[inline]
    pub fn excluded(&self, x: u32, y: u32) -> bool {
        match self.source {
            None => false,
            Some(source) => (source.sample(x, y) <= self.threshold) != self.reversed,
        }
    }
}
