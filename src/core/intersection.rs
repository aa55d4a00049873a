use std::sync::Arc;

use nalgebra::{Point3, Vector3};

use crate::core::ray::Ray;
use crate::materials::material::Material;

/// Everything the shading pass needs to know about a ray-surface hit.
///
/// A fresh record has `hit_object = false` and `t = +inf`. Primitive
/// intersection calls may only improve it: set `hit_object` and move `t`
/// closer, never overwrite a closer hit with a farther one. Linear and
/// bucket intersection loops call every primitive unconditionally and rely
/// on this.
#[derive(Clone)]
pub struct Intersection {
    pub hit_object: bool,
    pub hit_point: Point3<f32>,
    pub normal: Vector3<f32>,
    pub ray: Ray,
    pub material: Option<Arc<dyn Material>>,
    pub depth: i32,
    pub t: f32,
}

impl Intersection {
    pub fn new() -> Self {
        Self {
            hit_object: false,
            hit_point: Point3::origin(),
            normal: Vector3::zeros(),
            ray: Ray::default(),
            material: None,
            depth: 0,
            t: f32::INFINITY,
        }
    }
}

impl Default for Intersection {
    fn default() -> Self {
        Intersection::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_record_has_no_hit() {
        let isect = Intersection::new();
        assert!(!isect.hit_object);
        assert!(isect.material.is_none());
        assert_eq!(isect.t, f32::INFINITY);
    }
}
