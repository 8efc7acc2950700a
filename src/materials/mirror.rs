use crate::core::geometry::vector::Vector3f;
use crate::core::material::Material;
use crate::materials::MaterialProps;

pub fn create_mirror_material(props: &MaterialProps) -> Material {
    let mut mat = Material {
        kr: Vector3f::splat(0.9),
        rs: 0.0,
        ..Default::default()
    };

    if let Some(kr) = &props.kr {
        mat.kr = kr.value;
        mat.kr_txt = kr.texture.clone();
    }

    mat.bump_txt = props.bump.clone();
    mat
}
