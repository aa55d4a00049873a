use std::sync::Arc;

use crate::core::bbox::BBox;
use crate::core::intersection::Intersection;
use crate::core::primitive::{refine_all, Primitive};
use crate::core::ray::Ray;

/// Accelerator that tests a ray against every contained primitive in turn.
///
/// No structure beyond the refined primitive list is built; queries are
/// O(n). This is the correctness baseline the grid is tested against.
pub struct BruteForce {
    primitives: Vec<Arc<dyn Primitive>>,
}

impl BruteForce {
    pub fn new(primitives: Vec<Arc<dyn Primitive>>) -> Self {
        Self {
            primitives: refine_all(primitives),
        }
    }
}

impl Primitive for BruteForce {
    fn intersect(&self, ray: &mut Ray, isect: &mut Intersection) -> bool {
        for prim in &self.primitives {
            prim.intersect(ray, isect);
        }
        isect.hit_object
    }

    fn intersect_p(&self, ray: &Ray) -> bool {
        self.primitives.iter().any(|prim| prim.intersect_p(ray))
    }

    fn bounds(&self) -> BBox {
        self.primitives
            .iter()
            .fold(BBox::empty(), |b, prim| BBox::combine(&b, &prim.bounds()))
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::{Point3, Vector3};

    use super::*;
    use crate::geometry::objects::mesh::Mesh;
    use crate::geometry::objects::sphere::Sphere;
    use crate::materials::material::{Material, Matte};
    use crate::utils::colour::Colour;

    fn sphere_at(center: Point3<f32>, radius: f32) -> Arc<dyn Primitive> {
        let material = Arc::new(Matte::new(Colour::new(0.8, 0.8, 0.8)));
        Arc::new(Sphere::new(center, radius, material))
    }

    #[test]
    fn test_unit_sphere_closest_hit() {
        let accel = BruteForce::new(vec![sphere_at(Point3::new(0.0, 0.0, 0.0), 1.0)]);
        let mut ray = Ray::new(Point3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        let mut isect = Intersection::new();

        assert!(accel.intersect(&mut ray, &mut isect));
        assert!((isect.t - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_closest_hit_across_primitives() {
        // Farther sphere stored first; the result must still be the
        // nearer one.
        let accel = BruteForce::new(vec![
            sphere_at(Point3::new(0.0, 0.0, 10.0), 1.0),
            sphere_at(Point3::new(0.0, 0.0, 0.0), 1.0),
        ]);
        let mut ray = Ray::new(Point3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        let mut isect = Intersection::new();

        assert!(accel.intersect(&mut ray, &mut isect));
        assert!((isect.t - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_any_hit_short_circuits_on_existence() {
        let accel = BruteForce::new(vec![
            sphere_at(Point3::new(0.0, 0.0, 0.0), 1.0),
            sphere_at(Point3::new(0.0, 0.0, 10.0), 1.0),
        ]);
        let ray = Ray::new(Point3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(accel.intersect_p(&ray));

        let miss = Ray::new(Point3::new(0.0, 5.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(!accel.intersect_p(&miss));
    }

    #[test]
    fn test_maxt_short_of_any_hit() {
        let accel = BruteForce::new(vec![sphere_at(Point3::new(0.0, 0.0, 0.0), 1.0)]);
        let mut ray = Ray::with_interval(
            Point3::new(0.0, 0.0, -5.0),
            Vector3::new(0.0, 0.0, 1.0),
            0.0,
            3.0,
        );
        let mut isect = Intersection::new();

        assert!(!accel.intersect(&mut ray, &mut isect));
        assert!(!isect.hit_object);
    }

    #[test]
    fn test_empty_collection() {
        let accel = BruteForce::new(Vec::new());
        let b = accel.bounds();
        assert_eq!(b.min.x, f32::INFINITY);
        assert_eq!(b.max.x, f32::NEG_INFINITY);

        let mut ray = Ray::new(Point3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        let mut isect = Intersection::new();
        assert!(!accel.intersect(&mut ray, &mut isect));
        assert!(!accel.intersect_p(&ray));
    }

    #[test]
    fn test_bounds_union_covers_all_primitives() {
        let prims = vec![
            sphere_at(Point3::new(-3.0, 0.0, 0.0), 1.0),
            sphere_at(Point3::new(5.0, 2.0, -1.0), 0.5),
        ];
        let accel = BruteForce::new(prims.clone());
        let bounds = accel.bounds();

        for prim in &prims {
            let pb = prim.bounds();
            for corner in [
                Point3::new(pb.min.x, pb.min.y, pb.min.z),
                Point3::new(pb.max.x, pb.min.y, pb.min.z),
                Point3::new(pb.min.x, pb.max.y, pb.min.z),
                Point3::new(pb.min.x, pb.min.y, pb.max.z),
                Point3::new(pb.max.x, pb.max.y, pb.min.z),
                Point3::new(pb.max.x, pb.min.y, pb.max.z),
                Point3::new(pb.min.x, pb.max.y, pb.max.z),
                Point3::new(pb.max.x, pb.max.y, pb.max.z),
            ] {
                assert!(bounds.contains(&corner));
            }
        }
    }

    #[test]
    fn test_refines_mesh_input() {
        let material: Arc<dyn Material> = Arc::new(Matte::new(Colour::new(0.8, 0.8, 0.8)));
        let mesh = Mesh::from_buffers(
            vec![
                Point3::new(-1.0, -1.0, 0.0),
                Point3::new(1.0, -1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
            material,
        );
        let accel = BruteForce::new(vec![Arc::new(mesh)]);

        let mut ray = Ray::new(Point3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        let mut isect = Intersection::new();
        assert!(accel.intersect(&mut ray, &mut isect));
        assert!((isect.t - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_monotonic_improvement() {
        let near = sphere_at(Point3::new(0.0, 0.0, 0.0), 1.0);
        let far = sphere_at(Point3::new(0.0, 0.0, 10.0), 1.0);

        let mut ray = Ray::new(Point3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        let mut isect = Intersection::new();

        assert!(far.intersect(&mut ray, &mut isect));
        let t_far = isect.t;
        assert!(near.intersect(&mut ray, &mut isect));
        assert!(isect.t < t_far);
        let t_near = isect.t;

        // Re-testing the far primitive must not clear or worsen the hit.
        assert!(!far.intersect(&mut ray, &mut isect));
        assert!(isect.hit_object);
        assert_eq!(isect.t, t_near);
    }
}
