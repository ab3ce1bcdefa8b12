//! Triangle facet type.

use crate::geometry::Point3;
use serde::{Deserialize, Serialize};

/// One triangular facet.
///
/// Terrain meshes are streamed straight to the encoder, so each facet
/// carries its own vertex coordinates instead of indexing into a shared
/// vertex buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub a: Point3,
    pub b: Point3,
    pub c: Point3,
}

impl Triangle {
    /// Create a facet from three vertices in winding order.
    #[inline]
    pub const fn new(a: Point3, b: Point3, c: Point3) -> Self {
        Self { a, b, c }
    }

    /// Unit facet normal derived from the winding order.
    ///
    /// Degenerate facets yield the zero vector, which STL consumers
    /// interpret as "recompute from the vertex order".
    pub fn normal(&self) -> Point3 {
        let e1 = self.b - self.a;
        let e2 = self.c - self.a;
        e1.cross(&e2).normalized_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ccw_triangle_faces_up() {
        let t = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        assert_eq!(t.normal(), Point3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_cw_triangle_faces_down() {
        let t = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
        );
        assert_eq!(t.normal(), Point3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_degenerate_triangle_has_zero_normal() {
        let p = Point3::new(1.0, 2.0, 3.0);
        let t = Triangle::new(p, p, p);
        assert_eq!(t.normal(), Point3::zero());
    }
}
