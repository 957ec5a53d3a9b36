//! Math types.
//!
//! Re-exports [`glam`] for CPU-side vector and matrix work and adds the few
//! geometric helpers the renderer shares between crates.
//!
//! ```
//! use inkstroke_core::math::{Mat4, Vec3};
//!
//! let transform = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0));
//! assert_eq!(transform.transform_point3(Vec3::ZERO).z, -5.0);
//! ```

pub use glam::*;

/// An axis-aligned bounding box.
///
/// An empty box has `min = +inf` and `max = -inf`, so expanding it by any
/// point yields a box containing just that point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point of the iterator.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        points.into_iter().fold(Self::EMPTY, |mut aabb, point| {
            aabb.expand(point);
            aabb
        })
    }

    pub fn expand(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// The eight corners of the box.
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// Box enclosing this box after an affine transform.
    ///
    /// Transforms all eight corners, so negative scales (mirrored meshes)
    /// still produce `min <= max`.
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        if self.is_empty() {
            return *self;
        }
        Self::from_points(self.corners().into_iter().map(|c| matrix.transform_point3(c)))
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_box_has_zero_size() {
        assert!(Aabb::EMPTY.is_empty());
        assert_eq!(Aabb::EMPTY.size(), Vec3::ZERO);
    }

    #[test]
    fn from_points_spans_all_points() {
        let aabb = Aabb::from_points([
            Vec3::new(1.0, -2.0, 0.0),
            Vec3::new(-3.0, 4.0, 1.0),
            Vec3::new(0.0, 0.0, -1.0),
        ]);
        assert_eq!(aabb.min, Vec3::new(-3.0, -2.0, -1.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 4.0, 1.0));
    }

    #[test]
    fn center_is_midpoint_of_extent() {
        let aabb = Aabb::new(Vec3::new(-2.0, 0.0, 1.0), Vec3::new(4.0, 6.0, 1.0));
        assert_eq!(aabb.center(), Vec3::new(1.0, 3.0, 1.0));
        assert_eq!(aabb.center() - aabb.size() * 0.5, aabb.min);
    }

    #[test]
    fn mirrored_transform_keeps_min_below_max() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::new(10.0, 20.0, 0.0));
        let matrix = Mat4::from_scale(Vec3::new(0.1, -0.1, 0.1));
        let out = aabb.transformed(&matrix);
        assert!((out.min.y - -2.0).abs() < 1e-5);
        assert!((out.max.y - 0.0).abs() < 1e-5);
        assert!((out.max.x - 1.0).abs() < 1e-5);
    }
}
