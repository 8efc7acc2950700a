use crate::core::camera::Camera;
use crate::core::light::Environment;
use crate::core::material::Material;
use crate::core::pbrt::Float;
use crate::core::shape::ShapeGroup;
use crate::core::texture::Texture;
use nalgebra::Matrix4;
use std::sync::Arc;

/// A placed shape group: a reference to the group plus its frame (the
/// world transformation it is instantiated with).
#[derive(Debug, Clone)]
pub struct Instance {
    pub name: String,
    pub shape_group: Arc<ShapeGroup>,
    pub frame: Matrix4<Float>,
}

/// The output scene graph. Collections hold entities in insertion order;
/// shared entities (shape groups, materials, textures) are reference
/// counted so instances and shapes can point at them.
#[derive(Default)]
pub struct Scene {
    pub cameras: Vec<Camera>,
    pub shapes: Vec<Arc<ShapeGroup>>,
    pub instances: Vec<Instance>,
    pub materials: Vec<Arc<Material>>,
    pub textures: Vec<Arc<Texture>>,
    pub environments: Vec<Environment>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CounterId {
    Shape,
    ShapeGroup,
    Instance,
    Material,
    Texture,
    Environment,
}

/// Per-kind monotonic counters for entity identifiers. Identifiers are
/// unique within one parse and stable in creation order; a counter is
/// consumed at entity creation even if the entity is never committed to
/// the scene.
#[derive(Debug, Default)]
pub struct IdGenerator {
    shape: usize,
    shape_group: usize,
    instance: usize,
    material: usize,
    texture: usize,
    environment: usize,
}

impl IdGenerator {
    pub fn fresh(&mut self, kind: CounterId) -> String {
        let (prefix, counter) = match kind {
            CounterId::Shape => ("s_", &mut self.shape),
            CounterId::ShapeGroup => ("sg_", &mut self.shape_group),
            CounterId::Instance => ("i_", &mut self.instance),
            CounterId::Material => ("m_", &mut self.material),
            CounterId::Texture => ("t_", &mut self.texture),
            CounterId::Environment => ("e_", &mut self.environment),
        };

        let id = format!("{}{}", prefix, *counter);
        *counter += 1;
        id
    }
}
