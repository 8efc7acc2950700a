use crate::core::geometry::vector::Vector3f;
use crate::core::material::Material;
use crate::materials::MaterialProps;

pub fn create_matte_material(props: &MaterialProps) -> Material {
    let mut mat = Material {
        kd: Vector3f::splat(0.5),
        rs: 1.0,
        ..Default::default()
    };

    if let Some(kd) = &props.kd {
        mat.kd = kd.value;
        mat.kd_txt = kd.texture.clone();
    }

    mat.bump_txt = props.bump.clone();
    mat
}
