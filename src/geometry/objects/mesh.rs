use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use log::debug;
use nalgebra::{Point3, Vector3};
use obj::{load_obj, Obj, Position};
use thiserror::Error;

use crate::core::bbox::BBox;
use crate::core::intersection::Intersection;
use crate::core::primitive::Primitive;
use crate::core::ray::Ray;
use crate::materials::material::Material;

#[derive(Debug, Error)]
pub enum MeshError {
    #[error("failed to read mesh file")]
    Io(#[from] std::io::Error),
    #[error("failed to parse OBJ data")]
    Obj(#[from] obj::ObjError),
}

/// Indexed triangle mesh.
///
/// A mesh cannot be intersected directly; accelerators refine it into
/// `Triangle` leaves that share the vertex buffer and material.
pub struct Mesh {
    positions: Arc<Vec<Point3<f32>>>,
    indices: Vec<[u32; 3]>,
    material: Arc<dyn Material>,
}

impl Mesh {
    pub fn from_file(path: impl AsRef<Path>, material: Arc<dyn Material>) -> Result<Self, MeshError> {
        let reader = BufReader::new(File::open(path)?);
        Self::from_reader(reader, material)
    }

    pub fn from_reader(reader: impl BufRead, material: Arc<dyn Material>) -> Result<Self, MeshError> {
        let model: Obj<Position, u32> = load_obj(reader)?;

        let positions = model
            .vertices
            .iter()
            .map(|v| Point3::new(v.position[0], v.position[1], v.position[2]))
            .collect();

        let mut indices = Vec::with_capacity(model.indices.len() / 3);
        for tri in model.indices.chunks_exact(3) {
            indices.push([tri[0], tri[1], tri[2]]);
        }

        Ok(Self::from_buffers(positions, indices, material))
    }

    pub fn from_buffers(
        positions: Vec<Point3<f32>>,
        indices: Vec<[u32; 3]>,
        material: Arc<dyn Material>,
    ) -> Self {
        debug!(
            "mesh: {} vertices, {} triangles",
            positions.len(),
            indices.len()
        );
        Self {
            positions: Arc::new(positions),
            indices,
            material,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }
}

impl Primitive for Mesh {
    fn intersect(&self, _ray: &mut Ray, _isect: &mut Intersection) -> bool {
        unreachable!("mesh must be refined before intersection")
    }

    fn intersect_p(&self, _ray: &Ray) -> bool {
        unreachable!("mesh must be refined before intersection")
    }

    fn bounds(&self) -> BBox {
        self.positions
            .iter()
            .fold(BBox::empty(), |b, &p| b.grow(p))
    }

    fn can_intersect(&self) -> bool {
        false
    }

    fn refine(&self, refined: &mut Vec<Arc<dyn Primitive>>) {
        for &indices in &self.indices {
            refined.push(Arc::new(Triangle {
                positions: self.positions.clone(),
                indices,
                material: self.material.clone(),
            }));
        }
    }
}

/// One face of a `Mesh`, produced by refinement.
pub struct Triangle {
    positions: Arc<Vec<Point3<f32>>>,
    indices: [u32; 3],
    material: Arc<dyn Material>,
}

impl Triangle {
    fn vertex(&self, i: usize) -> Point3<f32> {
        self.positions[self.indices[i] as usize]
    }
}

impl Primitive for Triangle {
    fn intersect(&self, ray: &mut Ray, isect: &mut Intersection) -> bool {
        let hit = match intersect_triangle(ray, self.vertex(0), self.vertex(1), self.vertex(2)) {
            Some(hit) => hit,
            None => return false,
        };

        ray.maxt = hit.t;
        isect.hit_object = true;
        isect.t = hit.t;
        isect.hit_point = ray.at(hit.t);
        isect.normal = hit.normal;
        isect.material = Some(self.material.clone());
        isect.depth = ray.depth;
        isect.ray = *ray;

        true
    }

    fn intersect_p(&self, ray: &Ray) -> bool {
        intersect_triangle(ray, self.vertex(0), self.vertex(1), self.vertex(2)).is_some()
    }

    fn bounds(&self) -> BBox {
        BBox::new(self.vertex(0), self.vertex(1)).grow(self.vertex(2))
    }
}

pub struct TriangleHit {
    pub t: f32,
    pub u: f32,
    pub v: f32,
    pub normal: Vector3<f32>,
}

/// Moeller-Trumbore ray/triangle test against the ray's valid interval.
pub fn intersect_triangle(
    ray: &Ray,
    v0: Point3<f32>,
    v1: Point3<f32>,
    v2: Point3<f32>,
) -> Option<TriangleHit> {
    let e1 = v1 - v0;
    let e2 = v2 - v0;

    let pvec = ray.direction.cross(&e2);
    let det = e1.dot(&pvec);
    // Parallel or degenerate.
    if det.abs() < 1e-8 {
        return None;
    }
    let inv_det = 1. / det;

    let tvec = ray.origin - v0;
    let u = tvec.dot(&pvec) * inv_det;
    if u < 0. || u > 1. {
        return None;
    }

    let qvec = tvec.cross(&e1);
    let v = ray.direction.dot(&qvec) * inv_det;
    if v < 0. || u + v > 1. {
        return None;
    }

    let t = e2.dot(&qvec) * inv_det;
    if t < ray.mint || t >= ray.maxt {
        return None;
    }

    Some(TriangleHit {
        t,
        u,
        v,
        normal: e1.cross(&e2).normalize(),
    })
}
