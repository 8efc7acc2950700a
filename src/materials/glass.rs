use crate::core::geometry::vector::Vector3f;
use crate::core::material::Material;
use crate::materials::MaterialProps;

pub fn create_glass_material(props: &MaterialProps) -> Material {
    let mut mat = Material {
        ks: Vector3f::splat(0.04),
        kt: Vector3f::splat(1.0),
        rs: 0.1,
        ..Default::default()
    };

    if let Some(ks) = &props.ks {
        mat.ks = ks.value;
        mat.ks_txt = ks.texture.clone();
    }

    if let Some(kt) = &props.kt {
        mat.kt = kt.value;
        mat.kt_txt = kt.texture.clone();
    }

    mat.bump_txt = props.bump.clone();
    mat
}
