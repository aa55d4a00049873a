use nalgebra::{Point3, Vector3};

use crate::core::ray::Ray;
use crate::utils::lerp;

/// Axis-aligned bounding box.
///
/// The identity box has `min = +inf` and `max = -inf` so that combining it
/// with any point or box yields that point or box unchanged.
#[derive(Debug, Clone, Copy)]
pub struct BBox {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl BBox {
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Point3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn from_point(p: Point3<f32>) -> Self {
        Self { min: p, max: p }
    }

    #[inline]
    pub fn new(p0: Point3<f32>, p1: Point3<f32>) -> Self {
        let min = Point3::new(p0.x.min(p1.x), p0.y.min(p1.y), p0.z.min(p1.z));
        let max = Point3::new(p0.x.max(p1.x), p0.y.max(p1.y), p0.z.max(p1.z));
        BBox { min, max }
    }

    #[inline]
    pub fn combine(box0: &BBox, box1: &BBox) -> BBox {
        let min = Point3::new(
            box0.min.x.min(box1.min.x),
            box0.min.y.min(box1.min.y),
            box0.min.z.min(box1.min.z),
        );
        let max = Point3::new(
            box0.max.x.max(box1.max.x),
            box0.max.y.max(box1.max.y),
            box0.max.z.max(box1.max.z),
        );
        BBox { min, max }
    }

    #[inline]
    pub fn grow(&self, p: Point3<f32>) -> BBox {
        BBox::combine(self, &BBox::from_point(p))
    }

    pub fn contains(&self, p: &Point3<f32>) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }

    pub fn overlaps(&self, b: &BBox) -> bool {
        let x = self.max.x >= b.min.x && self.min.x <= b.max.x;
        let y = self.max.y >= b.min.y && self.min.y <= b.max.y;
        let z = self.max.z >= b.min.z && self.min.z <= b.max.z;
        x && y && z
    }

    pub fn diagonal(&self) -> Vector3<f32> {
        self.max - self.min
    }

    pub fn centroid(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Axis of largest extent (0 = x, 1 = y, 2 = z).
    pub fn largest_axis(&self) -> usize {
        let diag = self.diagonal();
        if diag.x > diag.y && diag.x > diag.z {
            0
        } else if diag.y > diag.z {
            1
        } else {
            2
        }
    }

    /// Linear interpolation between `min` and `max`, per axis.
    pub fn lerp(&self, tx: f32, ty: f32, tz: f32) -> Point3<f32> {
        Point3::new(
            lerp(tx, self.min.x, self.max.x),
            lerp(ty, self.min.y, self.max.y),
            lerp(tz, self.min.z, self.max.z),
        )
    }

    /// Slab test against the ray's `[mint, maxt]` interval.
    ///
    /// Returns the narrowed entry/exit parameters when the ray's interval
    /// overlaps the box. Division by a zero direction component yields an
    /// infinite slab interval on that axis, which needs no special case: a
    /// ray parallel to the slab planes is either always inside the slab or
    /// always outside it.
    pub fn intersect_p(&self, ray: &Ray) -> Option<(f32, f32)> {
        let mut t0 = ray.mint;
        let mut t1 = ray.maxt;

        for axis in 0..3 {
            let inv_ray_dir = 1.0 / ray.direction[axis];
            let mut t_near = (self.min[axis] - ray.origin[axis]) * inv_ray_dir;
            let mut t_far = (self.max[axis] - ray.origin[axis]) * inv_ray_dir;

            if t_near > t_far {
                std::mem::swap(&mut t_near, &mut t_far);
            }
            t0 = if t_near > t0 { t_near } else { t0 };
            t1 = if t_far < t1 { t_far } else { t1 };
            if t0 > t1 {
                return None;
            }
        }

        Some((t0, t1))
    }
}

impl Default for BBox {
    fn default() -> Self {
        BBox::empty()
    }
}
