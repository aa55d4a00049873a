use nalgebra::Vector3;

pub type Colour = Vector3<f32>;
