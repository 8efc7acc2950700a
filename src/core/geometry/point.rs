use crate::core::geometry::vector::Vector3f;
use crate::core::pbrt::Float;
use std::ops::{Add, Sub};

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point2f {
    pub x: Float,
    pub y: Float,
}

impl Point2f {
    pub fn new(x: Float, y: Float) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Point3f {
    pub x: Float,
    pub y: Float,
    pub z: Float,
}

impl Point3f {
    pub fn new(x: Float, y: Float, z: Float) -> Self {
        Self { x, y, z }
    }
}

impl Sub for Point3f {
    type Output = Vector3f;

    fn sub(self, p: Point3f) -> Vector3f {
        Vector3f::new(self.x - p.x, self.y - p.y, self.z - p.z)
    }
}

impl Add<Vector3f> for Point3f {
    type Output = Point3f;

    fn add(self, v: Vector3f) -> Point3f {
        Point3f::new(self.x + v.x, self.y + v.y, self.z + v.z)
    }
}
