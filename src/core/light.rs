use crate::core::geometry::vector::Vector3f;
use crate::core::texture::Texture;
use std::sync::Arc;

/// An environment (infinite) light: constant emitted radiance, optionally
/// modulated by an environment map.
#[derive(Debug, Default, Clone)]
pub struct Environment {
    pub name: String,
    pub ke: Vector3f,
    pub ke_txt: Option<Arc<Texture>>,
}
