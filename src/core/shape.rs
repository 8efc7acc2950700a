use crate::core::geometry::normal::Normal3f;
use crate::core::geometry::point::{Point2f, Point3f};
use crate::core::material::Material;
use crate::core::pbrt::Float;
use std::sync::Arc;

/// Triangle-mesh (or point) geometry plus its material. Positions, normals
/// and texture coordinates are parallel per-vertex buffers; `triangles`
/// indexes into them. Point-light shapes use `points` instead.
#[derive(Debug, Default, Clone)]
pub struct Shape {
    pub name: String,
    pub material: Option<Arc<Material>>,
    pub pos: Vec<Point3f>,
    pub norm: Vec<Normal3f>,
    pub texcoord: Vec<Point2f>,
    pub triangles: Vec<[u32; 3]>,
    pub points: Vec<u32>,
    pub radius: Vec<Float>,
}

/// One or more shapes instantiated together. Instances reference a group,
/// never a bare shape.
#[derive(Debug, Default, Clone)]
pub struct ShapeGroup {
    pub name: String,
    pub shapes: Vec<Shape>,
}
