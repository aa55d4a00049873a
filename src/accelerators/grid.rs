use std::sync::Arc;

use log::debug;
use nalgebra::Vector3;

use crate::core::bbox::BBox;
use crate::core::intersection::Intersection;
use crate::core::primitive::{refine_all, Primitive};
use crate::core::ray::Ray;
use crate::utils::round_to_int;

/// Per-axis voxel resolution limit.
pub const MAX_VOXELS_PER_AXIS: usize = 128;

/// Pairwise-comparison lookup selecting the axis with the smallest next
/// crossing distance; ties resolve through the table, giving every query
/// the same deterministic visiting order.
const CMP_TO_AXIS: [usize; 8] = [2, 1, 2, 1, 2, 2, 0, 0];

/// One cell of the uniform grid: a bucket of the primitives whose bounds
/// overlap it. Performs the same scoped linear test as `BruteForce`; the
/// cell's position is implied by its index in the grid, so the bucket
/// itself stores nothing but the references.
#[derive(Clone)]
struct Voxel {
    primitives: Vec<Arc<dyn Primitive>>,
}

impl Voxel {
    fn new(prim: Arc<dyn Primitive>) -> Self {
        Self {
            primitives: vec![prim],
        }
    }

    fn add_primitive(&mut self, prim: Arc<dyn Primitive>) {
        self.primitives.push(prim);
    }

    fn intersect(&self, ray: &mut Ray, isect: &mut Intersection) -> bool {
        for prim in &self.primitives {
            prim.intersect(ray, isect);
        }
        isect.hit_object
    }

    fn intersect_p(&self, ray: &Ray) -> bool {
        self.primitives.iter().any(|prim| prim.intersect_p(ray))
    }
}

/// 3D-DDA stepping state for one traversal.
struct DdaState {
    pos: [i64; 3],
    step: [i64; 3],
    out: [i64; 3],
    next_crossing_t: [f32; 3],
    delta_t: [f32; 3],
}

impl DdaState {
    /// Steps into the neighbouring voxel across the nearest boundary.
    /// Returns `false` once the remaining cells lie beyond `maxt` or the
    /// ray has left the grid.
    fn advance(&mut self, maxt: f32) -> bool {
        let bits = (((self.next_crossing_t[0] < self.next_crossing_t[1]) as usize) << 2)
            | (((self.next_crossing_t[0] < self.next_crossing_t[2]) as usize) << 1)
            | ((self.next_crossing_t[1] < self.next_crossing_t[2]) as usize);
        let step_axis = CMP_TO_AXIS[bits];

        if maxt < self.next_crossing_t[step_axis] {
            return false;
        }
        self.pos[step_axis] += self.step[step_axis];
        if self.pos[step_axis] == self.out[step_axis] {
            return false;
        }
        self.next_crossing_t[step_axis] += self.delta_t[step_axis];
        true
    }
}

/// Uniform-grid accelerator.
///
/// Construction partitions the refined primitives into `nx * ny * nz`
/// voxels sized from the merged bounds and the primitive count; queries
/// walk the voxels the ray actually crosses with a 3D-DDA. The structure
/// is immutable after construction, so independent rays may query it
/// concurrently as long as each brings its own `Ray`/`Intersection` pair.
pub struct Grid {
    voxels: Vec<Option<Voxel>>,
    n_voxels: [usize; 3],
    width: Vector3<f32>,
    inv_width: Vector3<f32>,
    bounds: BBox,
    primitives: Vec<Arc<dyn Primitive>>,
}

impl Grid {
    pub fn new(primitives: Vec<Arc<dyn Primitive>>) -> Self {
        let primitives = refine_all(primitives);

        let mut bounds = BBox::empty();
        for prim in &primitives {
            bounds = BBox::combine(&bounds, &prim.bounds());
        }

        if primitives.is_empty() {
            debug!("grid: no primitives, degenerating to a single empty voxel");
            return Self {
                voxels: vec![None],
                n_voxels: [1, 1, 1],
                width: Vector3::zeros(),
                inv_width: Vector3::zeros(),
                bounds,
                primitives,
            };
        }

        // Aim for `3 * n^(1/3)` voxels per unit length along the longest
        // axis; fewer degrades toward brute force, more wastes memory on
        // empty cells.
        let delta = bounds.diagonal();
        let max_axis = bounds.largest_axis();
        let inv_max_width = 1. / delta[max_axis];
        let cube_root = 3. * (primitives.len() as f32).powf(1. / 3.);
        let voxels_per_unit = cube_root * inv_max_width;

        let mut n_voxels = [0usize; 3];
        for axis in 0..3 {
            n_voxels[axis] = round_to_int(delta[axis] * voxels_per_unit)
                .clamp(1, MAX_VOXELS_PER_AXIS as i64) as usize;
        }

        let mut width = Vector3::zeros();
        let mut inv_width = Vector3::zeros();
        for axis in 0..3 {
            width[axis] = delta[axis] / n_voxels[axis] as f32;
            inv_width[axis] = if width[axis] == 0. { 0. } else { 1. / width[axis] };
        }

        let nv = n_voxels[0] * n_voxels[1] * n_voxels[2];
        let mut grid = Self {
            voxels: vec![None; nv],
            n_voxels,
            width,
            inv_width,
            bounds,
            primitives,
        };

        for i in 0..grid.primitives.len() {
            let prim = grid.primitives[i].clone();
            let pb = prim.bounds();

            let mut vmin = [0usize; 3];
            let mut vmax = [0usize; 3];
            for axis in 0..3 {
                vmin[axis] = grid.pos_to_voxel(&pb.min, axis);
                vmax[axis] = grid.pos_to_voxel(&pb.max, axis);
            }

            for x in vmin[0]..=vmax[0] {
                for y in vmin[1]..=vmax[1] {
                    for z in vmin[2]..=vmax[2] {
                        let o = grid.offset(x, y, z);
                        match &mut grid.voxels[o] {
                            Some(voxel) => voxel.add_primitive(prim.clone()),
                            None => grid.voxels[o] = Some(Voxel::new(prim.clone())),
                        }
                    }
                }
            }
        }

        debug!(
            "grid: {}x{}x{} voxels for {} primitives",
            grid.n_voxels[0],
            grid.n_voxels[1],
            grid.n_voxels[2],
            grid.primitives.len()
        );

        grid
    }

    /// Voxel index of `p` along `axis`, clamped into the valid range so
    /// bounds that stick out by a floating-point hair cannot index out of
    /// the array.
    fn pos_to_voxel(&self, p: &nalgebra::Point3<f32>, axis: usize) -> usize {
        let v = ((p[axis] - self.bounds.min[axis]) * self.inv_width[axis]) as i64;
        v.clamp(0, self.n_voxels[axis] as i64 - 1) as usize
    }

    /// Lower world-space coordinate of voxel `p` along `axis`.
    fn voxel_to_pos(&self, p: i64, axis: usize) -> f32 {
        self.bounds.min[axis] + p as f32 * self.width[axis]
    }

    fn offset(&self, x: usize, y: usize, z: usize) -> usize {
        x + y * self.n_voxels[0] + z * self.n_voxels[0] * self.n_voxels[1]
    }

    /// Finds where the ray enters the grid and prepares the per-axis DDA
    /// stepping state. `None` when the ray's interval never overlaps the
    /// grid bounds, in which case no contained primitive can be hit
    /// either.
    fn enter(&self, ray: &Ray) -> Option<DdaState> {
        let ray_t = if self.bounds.contains(&ray.at(ray.mint)) {
            ray.mint
        } else {
            match self.bounds.intersect_p(ray) {
                Some((t0, _)) => t0,
                None => return None,
            }
        };
        let grid_intersect = ray.at(ray_t);

        let mut state = DdaState {
            pos: [0; 3],
            step: [0; 3],
            out: [0; 3],
            next_crossing_t: [0.; 3],
            delta_t: [0.; 3],
        };

        for axis in 0..3 {
            let pos = self.pos_to_voxel(&grid_intersect, axis) as i64;
            state.pos[axis] = pos;
            // A zero direction component pushes both the crossing distance
            // and the per-step delta to +-inf, so that axis never wins the
            // stepping comparison.
            if ray.direction[axis] >= 0. {
                state.next_crossing_t[axis] = ray_t
                    + (self.voxel_to_pos(pos + 1, axis) - grid_intersect[axis])
                        / ray.direction[axis];
                state.delta_t[axis] = self.width[axis] / ray.direction[axis];
                state.step[axis] = 1;
                state.out[axis] = self.n_voxels[axis] as i64;
            } else {
                state.next_crossing_t[axis] = ray_t
                    + (self.voxel_to_pos(pos, axis) - grid_intersect[axis]) / ray.direction[axis];
                state.delta_t[axis] = -self.width[axis] / ray.direction[axis];
                state.step[axis] = -1;
                state.out[axis] = -1;
            }
        }

        Some(state)
    }
}

impl Primitive for Grid {
    fn intersect(&self, ray: &mut Ray, isect: &mut Intersection) -> bool {
        let mut dda = match self.enter(ray) {
            Some(state) => state,
            None => return false,
        };

        let mut hit_something = false;
        loop {
            let o = self.offset(dda.pos[0] as usize, dda.pos[1] as usize, dda.pos[2] as usize);
            if let Some(voxel) = &self.voxels[o] {
                hit_something |= voxel.intersect(ray, isect);
            }
            if !dda.advance(ray.maxt) {
                break;
            }
        }

        hit_something
    }

    fn intersect_p(&self, ray: &Ray) -> bool {
        let mut dda = match self.enter(ray) {
            Some(state) => state,
            None => return false,
        };

        loop {
            let o = self.offset(dda.pos[0] as usize, dda.pos[1] as usize, dda.pos[2] as usize);
            if let Some(voxel) = &self.voxels[o] {
                if voxel.intersect_p(ray) {
                    return true;
                }
            }
            if !dda.advance(ray.maxt) {
                return false;
            }
        }
    }

    /// Precomputed union of all contained primitive bounds, O(1) unlike
    /// `BruteForce`.
    fn bounds(&self) -> BBox {
        self.bounds
    }
}
