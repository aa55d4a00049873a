use std::path::Path;

use thiserror::Error;

use crate::core::bbox::BBox;
use crate::core::intersection::Intersection;
use crate::core::primitive::Primitive;
use crate::core::ray::Ray;
use crate::utils::colour::Colour;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene description parsing is not implemented")]
    ParsingUnimplemented,
}

/// The renderable scene: a background colour and one aggregate primitive
/// (usually an accelerator) that all intersection queries delegate to.
pub struct Scene {
    pub background: Colour,
    aggregate: Box<dyn Primitive>,
}

impl Scene {
    pub fn new(aggregate: Box<dyn Primitive>) -> Self {
        Self {
            background: Colour::new(1., 1., 1.),
            aggregate,
        }
    }

    /// Builds a scene from a description file.
    pub fn from_file(_path: impl AsRef<Path>) -> Result<Self, SceneError> {
        Err(SceneError::ParsingUnimplemented)
    }

    pub fn intersect(&self, ray: &mut Ray, isect: &mut Intersection) -> bool {
        self.aggregate.intersect(ray, isect)
    }

    pub fn intersect_p(&self, ray: &Ray) -> bool {
        self.aggregate.intersect_p(ray)
    }

    /// Bounds of everything in the scene, i.e. the aggregate's bounds.
    pub fn bounds(&self) -> BBox {
        self.aggregate.bounds()
    }
}
