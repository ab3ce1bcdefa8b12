//! 3D point type in STL output space.

use crate::Coord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};

/// A 3D point with single-precision coordinates.
///
/// STL stores 32-bit floats on the wire, so points are f32 throughout
/// rather than being narrowed at the encoder boundary.
#[derive(Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: Coord,
    pub y: Coord,
    pub z: Coord,
}

impl Point3 {
    /// Create a new point with the given coordinates.
    #[inline]
    pub const fn new(x: Coord, y: Coord, z: Coord) -> Self {
        Self { x, y, z }
    }

    /// The origin (0, 0, 0).
    #[inline]
    pub const fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// A copy of this point projected onto the z = 0 plane.
    #[inline]
    pub fn floored(&self) -> Self {
        Self {
            x: self.x,
            y: self.y,
            z: 0.0,
        }
    }

    /// Cross product, treating both points as vectors from the origin.
    #[inline]
    pub fn cross(&self, other: &Point3) -> Point3 {
        Point3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Squared vector length.
    #[inline]
    pub fn length_squared(&self) -> Coord {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Vector length.
    #[inline]
    pub fn length(&self) -> Coord {
        self.length_squared().sqrt()
    }

    /// Unit-length copy of this vector, or the zero vector if its length
    /// is too small to normalize. STL consumers treat a zero normal as
    /// "derive from winding order".
    pub fn normalized_or_zero(&self) -> Point3 {
        let len = self.length();
        if len > Coord::EPSILON {
            Point3 {
                x: self.x / len,
                y: self.y / len,
                z: self.z / len,
            }
        } else {
            Point3::zero()
        }
    }
}

impl fmt::Debug for Point3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point3({}, {}, {})", self.x, self.y, self.z)
    }
}

impl Add for Point3 {
    type Output = Point3;

    #[inline]
    fn add(self, rhs: Point3) -> Point3 {
        Point3 {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl Sub for Point3 {
    type Output = Point3;

    #[inline]
    fn sub(self, rhs: Point3) -> Point3 {
        Point3 {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl Neg for Point3 {
    type Output = Point3;

    #[inline]
    fn neg(self) -> Point3 {
        Point3 {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}
