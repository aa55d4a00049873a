use nalgebra::{Point3, Vector3};

/// Default tolerance carried by new rays; consumers offset secondary-ray
/// origins by this to avoid self-intersection artifacts.
pub const DEFAULT_RAY_EPSILON: f32 = 1e-3;

/// A half-line in world space with a mutable valid parameter interval
/// `[mint, maxt)`.
///
/// Primitives shrink `maxt` to the parameter of each accepted hit, so
/// repeated intersection tests against the same ray converge to the
/// nearest surface without any coordination between the primitives.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
    pub mint: f32,
    pub maxt: f32,
    pub epsilon: f32,
    pub depth: i32,
}

impl Ray {
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction,
            mint: 0.,
            maxt: f32::INFINITY,
            epsilon: DEFAULT_RAY_EPSILON,
            depth: 0,
        }
    }

    pub fn with_interval(
        origin: Point3<f32>,
        direction: Vector3<f32>,
        mint: f32,
        maxt: f32,
    ) -> Self {
        Self {
            origin,
            direction,
            mint,
            maxt,
            epsilon: DEFAULT_RAY_EPSILON,
            depth: 0,
        }
    }

    pub fn at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }
}

impl Default for Ray {
    fn default() -> Self {
        Ray::new(Point3::origin(), Vector3::zeros())
    }
}
