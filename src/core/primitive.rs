use std::sync::Arc;

use crate::core::bbox::BBox;
use crate::core::intersection::Intersection;
use crate::core::ray::Ray;

/// Anything a ray can be tested against: leaf geometry, composites that
/// refine into leaves, and acceleration structures over other primitives.
///
/// The default `can_intersect`/`refine` implementations encode the
/// acceleration-structure role: directly intersectable, nothing to refine.
/// A composite overrides `can_intersect` to return `false` and implements
/// `refine`; callers must route such primitives through `refine` and never
/// ask them for `intersect` or `bounds`.
pub trait Primitive: Send + Sync {
    /// Closest-hit query. Improves `isect` in place when a nearer hit is
    /// found inside `[ray.mint, ray.maxt)` and shrinks `ray.maxt` to it.
    /// Returns whether this call improved the record.
    fn intersect(&self, ray: &mut Ray, isect: &mut Intersection) -> bool;

    /// Any-hit query, free of shading bookkeeping. Used for
    /// shadow/occlusion tests.
    fn intersect_p(&self, ray: &Ray) -> bool;

    /// World-space bounding box.
    fn bounds(&self) -> BBox;

    fn can_intersect(&self) -> bool {
        true
    }

    /// Expands a non-intersectable primitive into directly intersectable
    /// ones, appended to `refined`.
    fn refine(&self, _refined: &mut Vec<Arc<dyn Primitive>>) {}
}

/// Construction-time refinement pass shared by the accelerators: keeps
/// intersectable primitives as-is and absorbs the refined output of the
/// rest.
pub fn refine_all(primitives: Vec<Arc<dyn Primitive>>) -> Vec<Arc<dyn Primitive>> {
    let mut refined = Vec::with_capacity(primitives.len());
    for prim in primitives {
        if prim.can_intersect() {
            refined.push(prim);
        } else {
            prim.refine(&mut refined);
        }
    }
    refined
}

#[cfg(test)]
mod tests {
    use nalgebra::{Point3, Vector3};

    use super::*;
    use crate::geometry::objects::sphere::Sphere;
    use crate::materials::material::Matte;
    use crate::utils::colour::Colour;

    struct PairOfSpheres;

    impl Primitive for PairOfSpheres {
        fn intersect(&self, _ray: &mut Ray, _isect: &mut Intersection) -> bool {
            unreachable!("composite must be refined before intersection")
        }

        fn intersect_p(&self, _ray: &Ray) -> bool {
            unreachable!("composite must be refined before intersection")
        }

        fn bounds(&self) -> BBox {
            BBox::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(4.0, 1.0, 1.0))
        }

        fn can_intersect(&self) -> bool {
            false
        }

        fn refine(&self, refined: &mut Vec<Arc<dyn Primitive>>) {
            let material = Arc::new(Matte::new(Colour::new(0.5, 0.5, 0.5)));
            refined.push(Arc::new(Sphere::new(
                Point3::new(0.0, 0.0, 0.0),
                1.0,
                material.clone(),
            )));
            refined.push(Arc::new(Sphere::new(
                Point3::new(3.0, 0.0, 0.0),
                1.0,
                material,
            )));
        }
    }

    #[test]
    fn test_refine_all_keeps_leaves_and_expands_composites() {
        let material = Arc::new(Matte::new(Colour::new(0.5, 0.5, 0.5)));
        let leaf: Arc<dyn Primitive> =
            Arc::new(Sphere::new(Point3::new(0.0, 5.0, 0.0), 1.0, material));
        let composite: Arc<dyn Primitive> = Arc::new(PairOfSpheres);

        let refined = refine_all(vec![leaf.clone(), composite]);

        assert_eq!(refined.len(), 3);
        assert!(Arc::ptr_eq(&refined[0], &leaf));
        assert!(refined.iter().all(|p| p.can_intersect()));
    }

    #[test]
    fn test_refined_leaves_are_intersectable() {
        let refined = refine_all(vec![Arc::new(PairOfSpheres) as Arc<dyn Primitive>]);
        let mut ray = Ray::new(Point3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        let mut isect = Intersection::new();

        let hit = refined.iter().any(|p| p.intersect(&mut ray, &mut isect));
        assert!(hit);
        assert!((isect.t - 4.0).abs() < 1e-5);
    }
}
