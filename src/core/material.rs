use crate::core::geometry::vector::Vector3f;
use crate::core::pbrt::Float;
use crate::core::texture::Texture;
use std::sync::Arc;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MaterialKind {
    SpecularRoughness,
    MetallicRoughness,
}

impl Default for MaterialKind {
    fn default() -> Self {
        MaterialKind::SpecularRoughness
    }
}

/// A scene material. Field meanings follow the specular/metallic-roughness
/// model the shape handlers and the mix blender operate on: `kd` diffuse,
/// `ks` specular, `kr` reflective, `kt` transmissive, `ke` emitted radiance,
/// `rs` roughness, `op` opacity.
#[derive(Debug, Clone)]
pub struct Material {
    pub name: String,
    pub kind: MaterialKind,
    pub kd: Vector3f,
    pub ks: Vector3f,
    pub kr: Vector3f,
    pub kt: Vector3f,
    pub ke: Vector3f,
    pub rs: Float,
    pub op: Float,
    pub double_sided: bool,
    pub kd_txt: Option<Arc<Texture>>,
    pub ks_txt: Option<Arc<Texture>>,
    pub kr_txt: Option<Arc<Texture>>,
    pub kt_txt: Option<Arc<Texture>>,
    pub rs_txt: Option<Arc<Texture>>,
    pub bump_txt: Option<Arc<Texture>>,
    pub disp_txt: Option<Arc<Texture>>,
    pub norm_txt: Option<Arc<Texture>>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            kind: MaterialKind::default(),
            kd: Vector3f::default(),
            ks: Vector3f::default(),
            kr: Vector3f::default(),
            kt: Vector3f::default(),
            ke: Vector3f::default(),
            rs: 0.0,
            op: 1.0,
            double_sided: false,
            kd_txt: None,
            ks_txt: None,
            kr_txt: None,
            kt_txt: None,
            rs_txt: None,
            bump_txt: None,
            disp_txt: None,
            norm_txt: None,
        }
    }
}
