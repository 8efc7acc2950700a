use crate::core::geometry::vector::Vector3f;
use crate::core::material::{Material, MaterialKind};
use crate::core::pbrt::Float;
use crate::materials::MaterialProps;

/// Normal-incidence reflectance of a conductor with the given complex index
/// of refraction.
fn fresnel_metal(eta: Vector3f, k: Vector3f) -> Vector3f {
    fn f0(eta: Float, k: Float) -> Float {
        ((eta - 1.0) * (eta - 1.0) + k * k) / ((eta + 1.0) * (eta + 1.0) + k * k)
    }

    Vector3f::new(f0(eta.x, k.x), f0(eta.y, k.y), f0(eta.z, k.z))
}

pub fn create_metal_material(props: &MaterialProps) -> Material {
    let mut mat = Material {
        kind: MaterialKind::MetallicRoughness,
        rs: 0.01,
        ..Default::default()
    };

    let eta = props
        .eta
        .as_ref()
        .map(|p| p.value)
        .unwrap_or_else(|| Vector3f::splat(0.5));
    let k = props
        .k
        .as_ref()
        .map(|p| p.value)
        .unwrap_or_else(|| Vector3f::splat(0.5));

    mat.ks = fresnel_metal(eta, k);
    mat.ks_txt = props.eta.as_ref().and_then(|p| p.texture.clone());

    if let Some(rs) = &props.rs {
        mat.rs = rs.value;
        mat.rs_txt = rs.texture.clone();
    }

    mat.bump_txt = props.bump.clone();
    mat
}
