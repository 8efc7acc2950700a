use crate::core::geometry::vector::Vector3f;
use crate::core::pbrt::Float;
use crate::core::texture::Texture;
use std::sync::Arc;

pub mod glass;
pub mod matte;
pub mod metal;
pub mod mirror;
pub mod mix;
pub mod plastic;
pub mod translucent;
pub mod uber;

/// A color-valued material parameter: the declared constant, or (1,1,1)
/// plus the referenced texture when a texture was substituted for it.
#[derive(Default, Clone)]
pub struct ColorProp {
    pub value: Vector3f,
    pub texture: Option<Arc<Texture>>,
}

#[derive(Default, Clone)]
pub struct ScalarProp {
    pub value: Float,
    pub texture: Option<Arc<Texture>>,
}

/// Everything a Material or MakeNamedMaterial directive can declare,
/// collected before the subtype decides which fields apply. `None` means
/// the parameter was absent and the subtype default stands.
#[derive(Default, Clone)]
pub struct MaterialProps {
    pub type_name: Option<String>,
    pub kd: Option<ColorProp>,
    pub ks: Option<ColorProp>,
    pub kr: Option<ColorProp>,
    pub kt: Option<ColorProp>,
    pub eta: Option<ColorProp>,
    pub k: Option<ColorProp>,
    pub rs: Option<ScalarProp>,
    pub amount: Option<Float>,
    pub named_material1: Option<String>,
    pub named_material2: Option<String>,
    pub bump: Option<Arc<Texture>>,
}
