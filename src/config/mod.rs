//! Configuration for mesh generation and STL output.
//!
//! A [`Config`] is constructed once (typically by the CLI front end),
//! validated, and passed by reference into [`crate::MeshBuilder`] and the
//! [`crate::stl`] encoders. There is no global configuration state.

use crate::{Coord, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// STL wire format selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum StlFormat {
    /// Human-readable `solid`/`facet` text form.
    Ascii,
    /// 80-byte header, u32 count, 50-byte facet records.
    #[default]
    Binary,
}

/// Where the exclusion mask comes from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaskSource {
    /// No masking; every cell is meshed.
    #[default]
    None,
    /// An independently loaded raster of identical dimensions.
    File(PathBuf),
    /// The primary heightmap doubles as its own mask.
    SelfMask,
}

/// Immutable mesh-generation settings.
///
/// Defaults mirror the historical tool: binary output, base enabled,
/// no scaling, one unit of base thickness, mask threshold at the middle
/// of the 8-bit range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Scaling factor applied to raw samples before the offset. Must be
    /// strictly positive so scaled elevations are never negative.
    pub zscale: Coord,

    /// Offset added after scaling; doubles as the minimum wall/base
    /// thickness. Must be at least 1.0.
    pub baseheight: Coord,

    /// Output wire format.
    pub format: StlFormat,

    /// Emit walls and a bottom cap in addition to the terrain surface,
    /// producing a solid printable volume.
    pub base: bool,

    /// Mask source selection.
    pub mask: MaskSource,

    /// Maximum sample value considered masked (0-255).
    pub threshold: u8,

    /// Invert the mask inclusion test.
    pub reversed: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            zscale: 1.0,
            baseheight: 1.0,
            format: StlFormat::Binary,
            base: true,
            mask: MaskSource::None,
            threshold: 127,
            reversed: false,
        }
    }
}

impl Config {
    /// Validate value ranges.
    ///
    /// The corner-interpolation code relies on scaled elevations being
    /// non-negative, so `zscale` must be strictly positive here.
    pub fn validate(&self) -> Result<()> {
        if !self.zscale.is_finite() || self.zscale <= 0.0 {
            return Err(Error::Config(format!(
                "zscale must be a number greater than 0, got {}",
                self.zscale
            )));
        }
        if !self.baseheight.is_finite() || self.baseheight < 1.0 {
            return Err(Error::Config(format!(
                "baseheight must be a number greater than or equal to 1, got {}",
                self.baseheight
            )));
        }
        Ok(())
    }
}
