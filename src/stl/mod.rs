//! STL serialization.
//!
//! Both wire forms stream facets as the [`MeshBuilder`] produces them;
//! nothing buffers the whole mesh. The binary form needs its triangle
//! count before the first facet, which comes from the builder's analytic
//! prepass rather than from generating the mesh twice into memory. A
//! complete binary file therefore always satisfies
//! `len == 84 + 50 * count`; a failed write aborts the run instead of
//! patching up a half-written file.

use crate::config::{Config, StlFormat};
use crate::mesh::MeshBuilder;
use crate::{Error, Result};
use std::io::Write;

/// Text carried in the binary header's 80 arbitrary bytes.
const BINARY_HEADER_TEXT: &[u8] = b"Binary STL terrain model generated by relief";

/// Serialize the mesh in the format the configuration selects.
pub fn write<W: Write>(writer: W, config: &Config, name: &str, builder: &MeshBuilder) -> Result<()> {
    match config.format {
        StlFormat::Ascii => write_ascii(writer, name, builder),
        StlFormat::Binary => write_binary(writer, builder),
    }
}

/// Serialize the mesh as ASCII STL under the given solid name.
pub fn write_ascii<W: Write>(mut writer: W, name: &str, builder: &MeshBuilder) -> Result<()> {
    writeln!(writer, "solid {}", name)?;
    builder.build(|t| {
        let n = t.normal();
        writeln!(writer, "facet normal {} {} {}", n.x, n.y, n.z)?;
        writeln!(writer, "outer loop")?;
        for v in [t.a, t.b, t.c] {
            writeln!(writer, "vertex {} {} {}", v.x, v.y, v.z)?;
        }
        writeln!(writer, "endloop")?;
        writeln!(writer, "endfacet")?;
        Ok(())
    })?;
    writeln!(writer, "endsolid {}", name)?;
    writer.flush()?;
    Ok(())
}

/// Serialize the mesh as binary STL: 80-byte header, little-endian u32
/// facet count, then one 50-byte record per facet (normal and three
/// vertices as 12 little-endian f32, plus a zero u16 attribute field).
pub fn write_binary<W: Write>(mut writer: W, builder: &MeshBuilder) -> Result<()> {
    let total = builder.triangle_count();
    let count = u32::try_from(total).map_err(|_| {
        Error::Overflow(format!(
            "mesh of {} triangles exceeds the binary STL count field",
            total
        ))
    })?;

    let mut header = [0u8; 80];
    header[..BINARY_HEADER_TEXT.len()].copy_from_slice(BINARY_HEADER_TEXT);
    writer.write_all(&header)?;
    writer.write_all(&count.to_le_bytes())?;

    builder.build(|t| {
        let n = t.normal();
        for p in [n, t.a, t.b, t.c] {
            writer.write_all(&p.x.to_le_bytes())?;
            writer.write_all(&p.y.to_le_bytes())?;
            writer.write_all(&p.z.to_le_bytes())?;
        }
        writer.write_all(&[0u8, 0u8])?;
        Ok(())
    })?;
    writer.flush()?;
    Ok(())
}
