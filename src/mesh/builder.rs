//! Grid tessellation.
//!
//! [`MeshBuilder`] walks the heightmap cell by cell and streams facets
//! to a caller-supplied sink. Each visible cell becomes a four-triangle
//! fan around its center vertex:
//!
//! ```text
//! 1-------2
//! | \ I / |      1..4: corner vertices, offset half a cell from P,
//! |  \ /  |            z interpolated from the neighboring cells
//! | L P J |         P: center vertex at the cell's own elevation
//! |  / \  |      I..L: the four surface facets
//! | / K \ |
//! 4-------3
//! ```
//!
//! Corner elevations average the center with the two orthogonal and one
//! diagonal neighbor adjacent to that corner. Neighbors outside the grid
//! are absent and drop out of the average; masked neighbors still
//! contribute, so the surface stays continuous across mask boundaries.
//!
//! With base generation enabled, each cell also emits its bottom mirror
//! at z = 0 and a vertical wall quad across every exposed edge (one
//! whose across-edge neighbor is out of bounds or masked).

use crate::config::Config;
use crate::geometry::Point3;
use crate::mask::Mask;
use crate::mesh::Triangle;
use crate::{Coord, Heightmap, Result};

/// Offsets of the four edge-adjacent neighbors in N, E, S, W order,
/// matching the corner pairs (1-2, 2-3, 3-4, 4-1) of their wall quads.
const EDGE_OFFSETS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Streaming tessellator over a heightmap, mask and configuration.
///
/// Construction validates the mask dimensions and the configuration, so
/// a builder that exists can always generate. Triangles are produced in
/// deterministic row-major cell order.
pub struct MeshBuilder<'a> {
    heightmap: &'a Heightmap,
    mask: Mask<'a>,
    config: &'a Config,
}

impl<'a> MeshBuilder<'a> {
    /// Create a builder, failing fast on an out-of-range configuration
    /// or a mask whose dimensions do not match the heightmap.
    pub fn new(heightmap: &'a Heightmap, mask: Mask<'a>, config: &'a Config) -> Result<Self> {
        config.validate()?;
        mask.check_dimensions(heightmap)?;
        Ok(Self {
            heightmap,
            mask,
            config,
        })
    }

    /// Stream every facet of the mesh to `emit`, aborting on the first
    /// error the sink returns.
    pub fn build<F>(&self, mut emit: F) -> Result<()>
    where
        F: FnMut(Triangle) -> Result<()>,
    {
        for y in 0..self.heightmap.height() {
            for x in 0..self.heightmap.width() {
                if self.mask.excluded(x, y) {
                    continue;
                }
                self.cell(x, y, &mut emit)?;
            }
        }
        Ok(())
    }

    /// Number of facets [`build`](Self::build) will emit, computed
    /// analytically from the grid, mask and configuration without
    /// generating any geometry. Binary STL framing needs this up front.
    pub fn triangle_count(&self) -> u64 {
        let mut count = 0u64;
        for y in 0..self.heightmap.height() {
            for x in 0..self.heightmap.width() {
                if self.mask.excluded(x, y) {
                    continue;
                }
                count += 4;
                if self.config.base {
                    count += 2;
                    for (dx, dy) in EDGE_OFFSETS {
                        if self.exposed(x, y, dx, dy) {
                            count += 2;
                        }
                    }
                }
            }
        }
        count
    }

    /// Scaled output-space elevation of the sample at (x, y).
    #[inline]
    fn z_at(&self, x: u32, y: u32) -> Coord {
        self.config.baseheight + self.config.zscale * Coord::from(self.heightmap.sample(x, y))
    }

    /// Elevation of the neighbor at (x+dx, y+dy), absent outside the
    /// grid. Masked neighbors still report their elevation.
    fn neighbor_z(&self, x: u32, y: u32, dx: i32, dy: i32) -> Option<Coord> {
        let nx = i64::from(x) + i64::from(dx);
        let ny = i64::from(y) + i64::from(dy);
        if nx < 0
            || ny < 0
            || nx >= i64::from(self.heightmap.width())
            || ny >= i64::from(self.heightmap.height())
        {
            return None;
        }
        Some(self.z_at(nx as u32, ny as u32))
    }

    /// Whether the edge toward (dx, dy) adjoins an out-of-grid or masked
    /// cell and therefore needs a wall.
    fn exposed(&self, x: u32, y: u32, dx: i32, dy: i32) -> bool {
        let nx = i64::from(x) + i64::from(dx);
        let ny = i64::from(y) + i64::from(dy);
        if nx < 0
            || ny < 0
            || nx >= i64::from(self.heightmap.width())
            || ny >= i64::from(self.heightmap.height())
        {
            return true;
        }
        self.mask.excluded(nx as u32, ny as u32)
    }

    /// Corner elevation: the mean of the center and whichever of the
    /// three adjacent neighbors are present.
    fn corner_z(center: Coord, neighbors: [Option<Coord>; 3]) -> Coord {
        let mut sum = center;
        let mut count = 1u32;
        for z in neighbors.into_iter().flatten() {
            sum += z;
            count += 1;
        }
        sum / count as Coord
    }

    /// Two facets closing the vertical quad between a surface edge and
    /// its projection onto z = 0.
    fn wall<F>(a: &Point3, b: &Point3, emit: &mut F) -> Result<()>
    where
        F: FnMut(Triangle) -> Result<()>,
    {
        let a0 = a.floored();
        let b0 = b.floored();
        emit(Triangle::new(*a, *b, b0))?;
        emit(Triangle::new(b0, a0, *a))
    }

    /// Emit all facets for one visible cell.
    fn cell<F>(&self, x: u32, y: u32, emit: &mut F) -> Result<()>
    where
        F: FnMut(Triangle) -> Result<()>,
    {
        let grid_height = self.heightmap.height();

        let nw = self.neighbor_z(x, y, -1, -1);
        let n = self.neighbor_z(x, y, 0, -1);
        let ne = self.neighbor_z(x, y, 1, -1);
        let e = self.neighbor_z(x, y, 1, 0);
        let se = self.neighbor_z(x, y, 1, 1);
        let s = self.neighbor_z(x, y, 0, 1);
        let sw = self.neighbor_z(x, y, -1, 1);
        let w = self.neighbor_z(x, y, -1, 0);

        // Raster rows grow downward; output y grows upward.
        let zp = self.z_at(x, y);
        let xf = x as Coord;
        let yf = (grid_height - y) as Coord;
        let p = Point3::new(xf, yf, zp);

        // Corners 1..4 run clockwise from the upper left in output space.
        let v1 = Point3::new(xf - 0.5, yf + 0.5, Self::corner_z(zp, [nw, n, w]));
        let v2 = Point3::new(xf + 0.5, yf + 0.5, Self::corner_z(zp, [n, ne, e]));
        let v3 = Point3::new(xf + 0.5, yf - 0.5, Self::corner_z(zp, [e, se, s]));
        let v4 = Point3::new(xf - 0.5, yf - 0.5, Self::corner_z(zp, [w, s, sw]));

        // Surface fan, clockwise around the center so every facet winds
        // upward.
        emit(Triangle::new(v2, v1, p))?;
        emit(Triangle::new(v3, v2, p))?;
        emit(Triangle::new(v4, v3, p))?;
        emit(Triangle::new(v1, v4, p))?;

        if !self.config.base {
            return Ok(());
        }

        // Bottom mirror at z = 0, wound oppositely so it faces down.
        let b1 = v1.floored();
        let b2 = v2.floored();
        let b3 = v3.floored();
        let b4 = v4.floored();
        emit(Triangle::new(b1, b2, b4))?;
        emit(Triangle::new(b2, b3, b4))?;

        // Walls only where the solid would otherwise have an open side.
        if self.exposed(x, y, 0, -1) {
            Self::wall(&v1, &v2, emit)?;
        }
        if self.exposed(x, y, 1, 0) {
            Self::wall(&v2, &v3, emit)?;
        }
        if self.exposed(x, y, 0, 1) {
            Self::wall(&v3, &v4, emit)?;
        }
        if self.exposed(x, y, -1, 0) {
            Self::wall(&v4, &v1, emit)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Coord;

    fn flat_raster(width: u32, height: u32, value: u8) -> Heightmap {
        Heightmap::from_raw(width, height, vec![value; (width * height) as usize]).unwrap()
    }

    fn collect(builder: &MeshBuilder) -> Vec<Triangle> {
        let mut triangles = Vec::new();
        builder
            .build(|t| {
                triangles.push(t);
                Ok(())
            })
            .unwrap();
        triangles
    }

    fn surface_only() -> Config {
        Config {
            base: false,
            ..Config::default()
        }
    }

    #[test]
    fn test_surface_only_count_is_four_per_cell() {
        let hm = flat_raster(5, 3, 100);
        let config = surface_only();
        let builder = MeshBuilder::new(&hm, Mask::none(), &config).unwrap();

        let triangles = collect(&builder);
        assert_eq!(triangles.len(), 4 * 5 * 3);
        assert_eq!(builder.triangle_count(), triangles.len() as u64);
    }

    #[test]
    fn test_flat_2x2_surface() {
        // All-zero samples with zscale 1 and baseheight 1: every cell is
        // a corner cell, every present neighbor sits at z = 1, so each
        // corner average collapses to 1.0 exactly.
        let hm = flat_raster(2, 2, 0);
        let config = surface_only();
        let builder = MeshBuilder::new(&hm, Mask::none(), &config).unwrap();

        let triangles = collect(&builder);
        assert_eq!(triangles.len(), 16);
        for t in &triangles {
            for v in [t.a, t.b, t.c] {
                assert_eq!(v.z, 1.0);
            }
            assert_eq!(t.normal(), Point3::new(0.0, 0.0, 1.0));
        }
    }

    #[test]
    fn test_all_masked_grid_is_empty() {
        let hm = flat_raster(4, 4, 50);
        // Threshold 255 excludes every possible sample value.
        let mask_raster = flat_raster(4, 4, 0);
        let mask = Mask::over(&mask_raster, 255, false);
        let config = Config::default();
        let builder = MeshBuilder::new(&hm, mask, &config).unwrap();

        assert_eq!(builder.triangle_count(), 0);
        assert!(collect(&builder).is_empty());
    }

    #[test]
    fn test_base_count_for_unmasked_grid() {
        // 3x3 with base: 4 surface + 2 bottom per cell, plus 2 wall
        // triangles for each of the 12 outer border edges.
        let hm = flat_raster(3, 3, 10);
        let config = Config::default();
        let builder = MeshBuilder::new(&hm, Mask::none(), &config).unwrap();

        let triangles = collect(&builder);
        assert_eq!(triangles.len(), 9 * 6 + 2 * 12);
        assert_eq!(builder.triangle_count(), triangles.len() as u64);
    }

    #[test]
    fn test_walls_only_on_outer_border() {
        let hm = flat_raster(3, 3, 10);
        let config = Config::default();
        let builder = MeshBuilder::new(&hm, Mask::none(), &config).unwrap();

        // Wall facets mix surface and floor vertices; surface z is at
        // least baseheight and bottom z is 0, so the mix identifies them.
        let walls: Vec<Triangle> = collect(&builder)
            .into_iter()
            .filter(|t| {
                let zs = [t.a.z, t.b.z, t.c.z];
                zs.iter().any(|&z| z == 0.0) && zs.iter().any(|&z| z > 0.0)
            })
            .collect();
        assert_eq!(walls.len(), 2 * 12);

        // Every wall must lie in one of the four border planes.
        let (w, h) = (3.0, 3.0);
        for t in &walls {
            let xs = [t.a.x, t.b.x, t.c.x];
            let ys = [t.a.y, t.b.y, t.c.y];
            let on_border = xs.iter().all(|&x| x == -0.5)
                || xs.iter().all(|&x| x == w - 0.5)
                || ys.iter().all(|&y| y == 0.5)
                || ys.iter().all(|&y| y == h + 0.5);
            assert!(on_border, "interior wall at {:?}", t);
        }
    }

    #[test]
    fn test_masked_interior_cell_grows_walls() {
        let hm = flat_raster(3, 3, 10);
        // Exclude only the center cell.
        let mut mask_values = vec![255u8; 9];
        mask_values[4] = 0;
        let mask_raster = Heightmap::from_raw(3, 3, mask_values).unwrap();
        let mask = Mask::over(&mask_raster, 127, false);
        let config = Config::default();
        let builder = MeshBuilder::new(&hm, mask, &config).unwrap();

        // 8 visible cells: 32 surface + 16 bottom, and 12 outer plus 4
        // center-facing exposed edges make 32 wall triangles.
        let triangles = collect(&builder);
        assert_eq!(triangles.len(), 32 + 16 + 32);
        assert_eq!(builder.triangle_count(), triangles.len() as u64);
    }

    #[test]
    fn test_masked_neighbor_still_contributes_to_corner() {
        // Cell (1,0) is masked out but in bounds, so cell (0,0)'s east
        // corners still average its elevation in.
        let hm = Heightmap::from_raw(2, 1, vec![0, 255]).unwrap();
        let mask_raster = Heightmap::from_raw(2, 1, vec![255, 0]).unwrap();
        let mask = Mask::over(&mask_raster, 127, false);
        let config = surface_only();
        let builder = MeshBuilder::new(&hm, mask, &config).unwrap();

        let triangles = collect(&builder);
        assert_eq!(triangles.len(), 4);

        // z(cell) = 1, z(masked neighbor) = 256; east corners average to
        // 128.5 while west corners stay at 1.
        let max_z = triangles
            .iter()
            .flat_map(|t| [t.a.z, t.b.z, t.c.z])
            .fold(Coord::MIN, Coord::max);
        assert_eq!(max_z, 128.5);
    }

    #[test]
    fn test_self_mask_equals_identical_file_mask() {
        let values: Vec<u8> = (0u16..64).map(|i| (i * 4) as u8).collect();
        let hm = Heightmap::from_raw(8, 8, values.clone()).unwrap();
        let copy = Heightmap::from_raw(8, 8, values).unwrap();
        let config = Config::default();

        let self_builder =
            MeshBuilder::new(&hm, Mask::over(&hm, 127, false), &config).unwrap();
        let file_builder =
            MeshBuilder::new(&hm, Mask::over(&copy, 127, false), &config).unwrap();

        assert_eq!(collect(&self_builder), collect(&file_builder));
        assert_eq!(self_builder.triangle_count(), file_builder.triangle_count());
    }

    #[test]
    fn test_bottom_faces_down() {
        let hm = flat_raster(1, 1, 7);
        let config = Config::default();
        let builder = MeshBuilder::new(&hm, Mask::none(), &config).unwrap();

        let bottoms: Vec<Triangle> = collect(&builder)
            .into_iter()
            .filter(|t| [t.a.z, t.b.z, t.c.z].iter().all(|&z| z == 0.0))
            .collect();
        assert_eq!(bottoms.len(), 2);
        for t in &bottoms {
            assert_eq!(t.normal(), Point3::new(0.0, 0.0, -1.0));
        }
    }

    #[test]
    fn test_rejects_mismatched_mask() {
        let hm = flat_raster(3, 3, 10);
        let mask_raster = flat_raster(2, 2, 10);
        let mask = Mask::over(&mask_raster, 127, false);
        let config = Config::default();
        assert!(MeshBuilder::new(&hm, mask, &config).is_err());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let hm = flat_raster(2, 2, 10);
        let config = Config {
            zscale: -1.0,
            ..Config::default()
        };
        assert!(MeshBuilder::new(&hm, Mask::none(), &config).is_err());
    }
}
