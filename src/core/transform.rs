use crate::core::geometry::point::Point3f;
use crate::core::geometry::vector::Vector3f;
use crate::core::pbrt::Float;
use nalgebra::Matrix4;

/// Builders for the 4x4 matrices the transformation directives post-multiply
/// onto the current transformation matrix. Rotation angles are in radians;
/// the directive handlers convert from degrees.

pub fn translation(delta: &Vector3f) -> Matrix4<Float> {
    Matrix4::from_row_slice(&[
        1.0, 0.0, 0.0, delta.x,
        0.0, 1.0, 0.0, delta.y,
        0.0, 0.0, 1.0, delta.z,
        0.0, 0.0, 0.0, 1.0,
    ])
}

pub fn scaling(x: Float, y: Float, z: Float) -> Matrix4<Float> {
    Matrix4::from_row_slice(&[
        x, 0.0, 0.0, 0.0,
        0.0, y, 0.0, 0.0,
        0.0, 0.0, z, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ])
}

pub fn rotation(theta: Float, axis: &Vector3f) -> Matrix4<Float> {
    let a = axis.normalize();
    let sin_theta = theta.sin();
    let cos_theta = theta.cos();
    let mut m: Matrix4<Float> = Matrix4::identity();

    m[(0, 0)] = a.x * a.x + (1.0 - a.x * a.x) * cos_theta;
    m[(0, 1)] = a.x * a.y * (1.0 - cos_theta) - a.z * sin_theta;
    m[(0, 2)] = a.x * a.z * (1.0 - cos_theta) + a.y * sin_theta;

    m[(1, 0)] = a.x * a.y * (1.0 - cos_theta) + a.z * sin_theta;
    m[(1, 1)] = a.y * a.y + (1.0 - a.y * a.y) * cos_theta;
    m[(1, 2)] = a.y * a.z * (1.0 - cos_theta) - a.x * sin_theta;

    m[(2, 0)] = a.x * a.z * (1.0 - cos_theta) - a.y * sin_theta;
    m[(2, 1)] = a.y * a.z * (1.0 - cos_theta) + a.x * sin_theta;
    m[(2, 2)] = a.z * a.z + (1.0 - a.z * a.z) * cos_theta;

    m
}

/// Camera frame for the LookAt directive: basis columns x, y, z and the eye
/// as origin, with the x and z axes negated so the frame faces the focus
/// point the way the scene graph expects.
pub fn look_at(eye: &Point3f, focus: &Point3f, up: &Vector3f) -> Matrix4<Float> {
    let z = (*eye - *focus).normalize();
    let x = up.normalize().cross(&z).normalize();
    let y = z.cross(&x);

    frame_to_matrix(&-x, &y, &-z, eye)
}

pub fn frame_to_matrix(x: &Vector3f, y: &Vector3f, z: &Vector3f, o: &Point3f) -> Matrix4<Float> {
    Matrix4::from_row_slice(&[
        x.x, y.x, z.x, o.x,
        x.y, y.y, z.y, o.y,
        x.z, y.z, z.z, o.z,
        0.0, 0.0, 0.0, 1.0,
    ])
}

pub fn matrix_origin(m: &Matrix4<Float>) -> Point3f {
    Point3f::new(m[(0, 3)], m[(1, 3)], m[(2, 3)])
}
