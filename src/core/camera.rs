use crate::core::pbrt::Float;
use nalgebra::Matrix4;

/// A perspective camera. `frame` is the camera-to-world matrix with the
/// local forward axis negated, as produced by the Camera directive.
#[derive(Debug, Clone)]
pub struct Camera {
    pub name: String,
    pub frame: Matrix4<Float>,
    pub yfov: Float,
    pub aspect: Float,
    pub aperture: Float,
    pub focus: Float,
}
