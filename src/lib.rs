//! Heightmap-to-STL terrain mesh generation.
//!
//! This crate converts 8-bit single-channel raster heightmaps (raw PGM,
//! "P5") into triangulated surface meshes serialized as ASCII or binary
//! STL, suitable for physical terrain prints or visualization.
//!
//! The pipeline:
//! 1. [`heightmap::pgm`] decodes the raster into a [`Heightmap`].
//! 2. An optional [`Mask`] excludes cells, backed by a second raster or
//!    by the heightmap itself.
//! 3. [`MeshBuilder`] walks the grid, interpolates corner elevations and
//!    streams surface, wall and bottom triangles.
//! 4. [`stl`] encodes the triangle stream in either STL wire format.
//!
//! ## Example
//! ```rust,ignore
//! use relief::{Config, Heightmap, Mask, MeshBuilder, stl};
//!
//! let hm = Heightmap::from_path("terrain.pgm")?;
//! let mask = Mask::none();
//! let config = Config::default();
//! let builder = MeshBuilder::new(&hm, &mask, &config)?;
//! let file = std::fs::File::create("terrain.stl")?;
//! stl::write(std::io::BufWriter::new(file), &config, "terrain", &builder)?;
//! ```

pub mod config;
pub mod geometry;
pub mod heightmap;
pub mod mask;
pub mod mesh;
pub mod stl;

pub use config::{Config, MaskSource, StlFormat};
pub use heightmap::Heightmap;
pub use mask::Mask;
pub use mesh::{MeshBuilder, Triangle};

/// Floating-point coordinate type used in output space.
///
/// STL stores 32-bit floats on the wire, so the whole pipeline works in
/// f32 rather than converting at the boundary.
pub type Coord = f32;

/// Error type for all fallible operations in the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed raster input: bad magic token, non-numeric or zero
    /// header field, unsupported depth.
    #[error("raster format error: {0}")]
    Format(String),

    /// A value exceeds the representable range (header integer, grid
    /// size, binary STL triangle count).
    #[error("value out of range: {0}")]
    Overflow(String),

    /// IO error: short read, open or write failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Mask raster incompatible with the primary heightmap.
    #[error("invalid mask: {0}")]
    Validation(String),

    /// Out-of-range configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
