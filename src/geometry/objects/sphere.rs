use std::sync::Arc;

use nalgebra::{Point3, Vector3};

use crate::core::bbox::BBox;
use crate::core::intersection::Intersection;
use crate::core::primitive::Primitive;
use crate::core::ray::Ray;
use crate::materials::material::Material;
use crate::utils::quadratic;

pub struct Sphere {
    center: Point3<f32>,
    radius: f32,
    material: Arc<dyn Material>,
}

impl Sphere {
    pub fn new(center: Point3<f32>, radius: f32, material: Arc<dyn Material>) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }

    /// Nearest quadratic root inside the ray's valid interval, if any.
    fn nearest_root(&self, ray: &Ray) -> Option<f32> {
        let oc = ray.origin - self.center;
        let a = ray.direction.norm_squared();
        let b = 2. * oc.dot(&ray.direction);
        let c = oc.norm_squared() - self.radius * self.radius;

        let (t0, t1) = quadratic(a, b, c)?;

        let mut t = t0;
        if t < ray.mint || t >= ray.maxt {
            t = t1;
            if t < ray.mint || t >= ray.maxt {
                return None;
            }
        }
        Some(t)
    }
}

impl Primitive for Sphere {
    fn intersect(&self, ray: &mut Ray, isect: &mut Intersection) -> bool {
        let t = match self.nearest_root(ray) {
            Some(t) => t,
            None => return false,
        };

        ray.maxt = t;
        isect.hit_object = true;
        isect.t = t;
        isect.hit_point = ray.at(t);
        isect.normal = (isect.hit_point - self.center) / self.radius;
        isect.material = Some(self.material.clone());
        isect.depth = ray.depth;
        isect.ray = *ray;

        true
    }

    fn intersect_p(&self, ray: &Ray) -> bool {
        self.nearest_root(ray).is_some()
    }

    fn bounds(&self) -> BBox {
        let rvec = Vector3::new(self.radius, self.radius, self.radius);
        BBox::new(self.center - rvec, self.center + rvec)
    }
}
