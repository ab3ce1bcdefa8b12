//! Command-line front end: argument parsing, stream plumbing, logging.
//!
//! Everything mesh-related lives in the library; this binary only turns
//! validated options into a [`Config`], opens the right streams and
//! reports failures once with a non-zero exit status.

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use relief::{heightmap::pgm, stl, Config, Heightmap, Mask, MaskSource, MeshBuilder, StlFormat};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

/// Convert 8-bit PGM heightmaps into printable STL terrain models.
#[derive(Parser, Debug)]
#[command(name = "relief", version, about)]
struct Args {
    /// Input heightmap (raw PGM); reads standard input when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output STL path; writes to standard output when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit ASCII STL instead of binary
    #[arg(short, long)]
    ascii: bool,

    /// Vertical scale applied to raw samples (must be greater than 0)
    #[arg(short, long, default_value_t = 1.0)]
    zscale: f32,

    /// Base thickness below the lowest terrain; offset added to every
    /// scaled elevation (must be at least 1)
    #[arg(short, long, default_value_t = 1.0)]
    baseheight: f32,

    /// Terrain surface only; omit walls and bottom
    #[arg(short, long)]
    surface_only: bool,

    /// Mask raster (raw PGM, same dimensions as the input); cells at or
    /// below the threshold are left out of the mesh
    #[arg(short, long)]
    mask: Option<PathBuf>,

    /// Use the heightmap as its own mask
    #[arg(long, conflicts_with = "mask")]
    self_mask: bool,

    /// Maximum sample value considered masked
    #[arg(short, long, default_value_t = 127)]
    threshold: u8,

    /// Reverse the mask test
    #[arg(short, long)]
    reversed: bool,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            zscale: self.zscale,
            baseheight: self.baseheight,
            format: if self.ascii {
                StlFormat::Ascii
            } else {
                StlFormat::Binary
            },
            base: !self.surface_only,
            mask: if self.self_mask {
                MaskSource::SelfMask
            } else if let Some(path) = &self.mask {
                MaskSource::File(path.clone())
            } else {
                MaskSource::None
            },
            threshold: self.threshold,
            reversed: self.reversed,
        }
    }
}

fn load_heightmap(path: Option<&PathBuf>) -> Result<Heightmap> {
    match path {
        Some(path) => Heightmap::from_path(path)
            .with_context(|| format!("cannot read heightmap {}", path.display())),
        None => {
            pgm::from_reader(io::stdin().lock()).context("cannot read heightmap from standard input")
        }
    }
}

/// Solid name for ASCII output, taken from the output file stem.
fn solid_name(output: Option<&PathBuf>) -> String {
    output
        .and_then(|p| p.file_stem())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "terrain".to_string())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = args.config();
    config.validate()?;

    let heightmap = load_heightmap(args.input.as_ref())?;
    info!(
        "heightmap {}x{}, sample range {}..{} (relief {})",
        heightmap.width(),
        heightmap.height(),
        heightmap.min(),
        heightmap.max(),
        heightmap.range()
    );

    // An independently loaded mask raster is owned here so the borrowed
    // view below can refer to it; self-mask borrows the heightmap itself.
    let mask_raster = match &config.mask {
        MaskSource::File(path) => Some(
            Heightmap::from_path(path)
                .with_context(|| format!("cannot read mask {}", path.display()))?,
        ),
        _ => None,
    };
    let mask = match (&config.mask, mask_raster.as_ref()) {
        (MaskSource::SelfMask, _) => Mask::over(&heightmap, config.threshold, config.reversed),
        (_, Some(raster)) => Mask::over(raster, config.threshold, config.reversed),
        _ => Mask::none(),
    };

    let builder = MeshBuilder::new(&heightmap, mask, &config)?;
    debug!("mesh will carry {} facets", builder.triangle_count());

    let name = solid_name(args.output.as_ref());
    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create output file {}", path.display()))?;
            stl::write(BufWriter::new(file), &config, &name, &builder)
                .with_context(|| format!("cannot write {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            stl::write(BufWriter::new(stdout.lock()), &config, &name, &builder)
                .context("cannot write to standard output")?;
        }
    }

    Ok(())
}
