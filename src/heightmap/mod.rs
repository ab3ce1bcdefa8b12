//! Heightmap grid and derived statistics.
//!
//! A [`Heightmap`] owns the decoded raster samples and the min/max
//! statistics computed by one linear scan at construction time. It is
//! read-only after loading: mesh generation and masking both consult it
//! through shared references.

pub mod pgm;

use crate::{Error, Result};

/// An 8-bit single-channel raster of elevation samples.
///
/// Samples are stored row-major, `values[y * width + x]`, exactly as they
/// appear in the raster file. The buffer is exclusively owned; self-mask
/// mode borrows it rather than cloning or re-owning it.
#[derive(Clone, Debug)]
pub struct Heightmap {
    width: u32,
    height: u32,
    values: Vec<u8>,
    min: u8,
    max: u8,
}

impl Heightmap {
    /// Build a heightmap from raw row-major samples, computing the
    /// min/max statistics in one pass.
    ///
    /// Fails if either dimension is zero or the sample buffer does not
    /// hold exactly `width * height` bytes.
    pub fn from_raw(width: u32, height: u32, values: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::Format(format!(
                "raster dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        let size = width as u64 * height as u64;
        if values.len() as u64 != size {
            return Err(Error::Validation(format!(
                "sample buffer holds {} bytes, expected {}",
                values.len(),
                size
            )));
        }

        // Seeded so a uniform raster still ends with min == max == value.
        let mut min = u8::MAX;
        let mut max = 0u8;
        for &v in &values {
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
        }

        Ok(Self {
            width,
            height,
            values,
            min,
            max,
        })
    }

    /// Decode a heightmap from a raw-PGM file.
    pub fn from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        pgm::from_reader(std::io::BufReader::new(file))
    }

    /// Grid width in cells.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in cells.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of samples (`width * height`).
    #[inline]
    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// Smallest sample value.
    #[inline]
    pub fn min(&self) -> u8 {
        self.min
    }

    /// Largest sample value.
    #[inline]
    pub fn max(&self) -> u8 {
        self.max
    }

    /// Relief: `max - min`.
    #[inline]
    pub fn range(&self) -> u8 {
        self.max - self.min
    }

    /// Sample value at grid position (x, y).
    ///
    /// # Panics
    /// Panics if the position lies outside the grid.
    #[inline]
    pub fn sample(&self, x: u32, y: u32) -> u8 {
        debug_assert!(x < self.width && y < self.height);
        self.values[y as usize * self.width as usize + x as usize]
    }

    /// The raw row-major sample buffer.
    #[inline]
    pub fn values(&self) -> &[u8] {
        &self.values
    }

    /// Whether another raster has the same grid dimensions.
    #[inline]
    pub fn same_dimensions(&self, other: &Heightmap) -> bool {
        self.width == other.width && self.height == other.height
    }
}
