//! Axis-aligned bounding box.
//!
//! Exposes exactly the operation set a SAH kd-tree build and traversal
//! needs: `union`, `surface_area`, `largest_axis`, slab intersection,
//! `contains`, componentwise get/set.

use crate::core::geometry::{Axis, Point3, Ray3};
use crate::core::pbrt::Float;

#[derive(Debug, Copy, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoundingBox {
    pub lower: Point3,
    pub upper: Point3,
}

impl Default for BoundingBox {
    /// An empty box: `lower` is `+inf` in every axis, `upper` is `-inf`, so
    /// that unioning with any real box yields that box unchanged.
    fn default() -> Self {
        BoundingBox {
            lower: Point3::new(Float::INFINITY, Float::INFINITY, Float::INFINITY),
            upper: Point3::new(
                Float::NEG_INFINITY,
                Float::NEG_INFINITY,
                Float::NEG_INFINITY,
            ),
        }
    }
}

impl BoundingBox {
    pub fn new(lower: Point3, upper: Point3) -> Self {
        BoundingBox { lower, upper }
    }

    pub fn get_index(&self, axis: Axis, is_upper: bool) -> Float {
        if is_upper {
            self.upper.get(axis)
        } else {
            self.lower.get(axis)
        }
    }

    pub fn set_index(&mut self, axis: Axis, is_upper: bool, v: Float) {
        if is_upper {
            self.upper.set(axis, v);
        } else {
            self.lower.set(axis, v);
        }
    }

    /// Extend `self` to include `other`, in place.
    pub fn union(&mut self, other: &BoundingBox) {
        self.lower.x = self.lower.x.min(other.lower.x);
        self.lower.y = self.lower.y.min(other.lower.y);
        self.lower.z = self.lower.z.min(other.lower.z);
        self.upper.x = self.upper.x.max(other.upper.x);
        self.upper.y = self.upper.y.max(other.upper.y);
        self.upper.z = self.upper.z.max(other.upper.z);
    }

    pub fn union_point(&mut self, p: &Point3) {
        self.lower.x = self.lower.x.min(p.x);
        self.lower.y = self.lower.y.min(p.y);
        self.lower.z = self.lower.z.min(p.z);
        self.upper.x = self.upper.x.max(p.x);
        self.upper.y = self.upper.y.max(p.y);
        self.upper.z = self.upper.z.max(p.z);
    }

    pub fn unioned(a: &BoundingBox, b: &BoundingBox) -> BoundingBox {
        let mut out = *a;
        out.union(b);
        out
    }

    fn extent(&self, axis: Axis) -> Float {
        self.upper.get(axis) - self.lower.get(axis)
    }

    /// `2 * (dx*dy + dy*dz + dz*dx)`; zero for a degenerate (or empty) box.
    pub fn surface_area(&self) -> Float {
        let d = self.upper - self.lower;
        if d.x < 0.0 || d.y < 0.0 || d.z < 0.0 {
            return 0.0;
        }
        2.0 * (d.x * d.y + d.y * d.z + d.z * d.x)
    }

    /// Axis of greatest extent; ties broken by lowest axis index.
    pub fn largest_axis(&self) -> Axis {
        let dx = self.extent(Axis::X);
        let dy = self.extent(Axis::Y);
        let dz = self.extent(Axis::Z);
        if dx >= dy && dx >= dz {
            Axis::X
        } else if dy >= dz {
            Axis::Y
        } else {
            Axis::Z
        }
    }

    /// Inclusive-on-all-faces point containment test.
    pub fn contains(&self, p: &Point3) -> bool {
        p.x >= self.lower.x
            && p.x <= self.upper.x
            && p.y >= self.lower.y
            && p.y <= self.upper.y
            && p.z >= self.lower.z
            && p.z <= self.upper.z
    }

    /// Slab-method ray/box intersection. Returns `(hit, t_min, t_max)`; when
    /// `hit` is false, `t_min`/`t_max` are meaningless.
    pub fn full_intersection(&self, ray: &Ray3) -> (bool, Float, Float) {
        let mut t_min = 0.0;
        let mut t_max = Float::INFINITY;
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            let o = ray.origin.get(axis);
            let d = ray.direction.get(axis);
            let lo = self.lower.get(axis);
            let hi = self.upper.get(axis);
            if d == 0.0 {
                if o < lo || o > hi {
                    return (false, 0.0, 0.0);
                }
                continue;
            }
            let inv_d = 1.0 / d;
            let mut t0 = (lo - o) * inv_d;
            let mut t1 = (hi - o) * inv_d;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return (false, 0.0, 0.0);
            }
        }
        (true, t_min, t_max)
    }
}
