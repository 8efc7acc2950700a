use crate::core::geometry::vector::Vector3f;
use crate::core::material::Material;
use crate::core::pbrt::Float;
use crate::core::scene::Scene;
use crate::core::shape::ShapeGroup;
use crate::core::texture::Texture;
use nalgebra::Matrix4;
use std::cell::Cell;
use std::collections::HashMap;
use std::sync::Arc;

/// State set by an AreaLightSource directive and consumed by the shapes that
/// follow it. Part of the graphics state, so it resets on attribute-pop.
#[derive(Debug, Clone)]
pub struct AreaLightInfo {
    pub active: bool,
    pub l: Vector3f,
    pub twosided: bool,
}

impl Default for AreaLightInfo {
    fn default() -> Self {
        Self {
            active: false,
            l: Vector3f::splat(1.0),
            twosided: false,
        }
    }
}

/// A named texture declaration pending commitment. The committed flag is a
/// `Cell` shared through the `Arc` so that cloned graphics states observe a
/// commitment made in any of them; commitment is idempotent.
#[derive(Debug)]
pub struct DeclaredTexture {
    pub texture: Arc<Texture>,
    pub uscale: Float,
    pub vscale: Float,
    committed: Cell<bool>,
}

impl DeclaredTexture {
    pub fn new(texture: Arc<Texture>, uscale: Float, vscale: Float) -> Self {
        Self {
            texture,
            uscale,
            vscale,
            committed: Cell::new(false),
        }
    }

    pub fn commit(&self, scene: &mut Scene) {
        if !self.committed.get() {
            self.committed.set(true);
            scene.textures.push(self.texture.clone());
        }
    }

    pub fn is_committed(&self) -> bool {
        self.committed.get()
    }
}

/// A material pending commitment; covers both named declarations and the
/// anonymous current material installed by a Material directive.
#[derive(Debug)]
pub struct DeclaredMaterial {
    pub material: Arc<Material>,
    committed: Cell<bool>,
}

impl DeclaredMaterial {
    pub fn new(material: Arc<Material>) -> Self {
        Self {
            material,
            committed: Cell::new(false),
        }
    }

    /// Born-committed, for materials that are pushed to the scene at
    /// creation time.
    pub fn committed(material: Arc<Material>) -> Self {
        Self {
            material,
            committed: Cell::new(true),
        }
    }

    pub fn commit(&self, scene: &mut Scene) {
        if !self.committed.get() {
            self.committed.set(true);
            scene.materials.push(self.material.clone());
        }
    }

    pub fn is_committed(&self) -> bool {
        self.committed.get()
    }
}

/// A named object template: the shape groups collected by an object block
/// and the transformation captured when the block closed. Object names are
/// parser-wide; the groups join the scene on first instantiation.
pub struct DeclaredObject {
    pub groups: Vec<Arc<ShapeGroup>>,
    pub ctm: Matrix4<Float>,
    pub committed: bool,
}

/// The shading and transformation context scene-building directives apply
/// to. Attribute blocks push and pop the whole state; transform blocks push
/// and pop only the matrix. Name tables clone with the state, sharing the
/// declared records themselves.
#[derive(Clone)]
pub struct GraphicsState {
    pub ctm: Matrix4<Float>,
    pub area_light: AreaLightInfo,
    pub material: Option<Arc<DeclaredMaterial>>,
    /// texcoord multipliers picked up from texture references, applied to
    /// shapes at attachment time
    pub uv_scale: (Float, Float),
    pub textures: HashMap<String, Arc<DeclaredTexture>>,
    pub materials: HashMap<String, Arc<DeclaredMaterial>>,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Matrix4::identity(),
            area_light: AreaLightInfo::default(),
            material: None,
            uv_scale: (1.0, 1.0),
            textures: HashMap::new(),
            materials: HashMap::new(),
        }
    }
}
