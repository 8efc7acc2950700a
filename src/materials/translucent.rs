use crate::core::geometry::vector::Vector3f;
use crate::core::material::Material;
use crate::materials::MaterialProps;

pub fn create_translucent_material(props: &MaterialProps) -> Material {
    let mut mat = Material {
        kd: Vector3f::splat(0.25),
        ks: Vector3f::splat(0.25),
        kr: Vector3f::splat(0.5),
        kt: Vector3f::splat(0.5),
        rs: 0.1,
        ..Default::default()
    };

    if let Some(kd) = &props.kd {
        mat.kd = kd.value;
        mat.kd_txt = kd.texture.clone();
    }

    if let Some(ks) = &props.ks {
        mat.ks = ks.value;
        mat.ks_txt = ks.texture.clone();
    }

    if let Some(kr) = &props.kr {
        mat.kr = kr.value;
        mat.kr_txt = kr.texture.clone();
    }

    if let Some(kt) = &props.kt {
        mat.kt = kt.value;
        mat.kt_txt = kt.texture.clone();
    }

    if let Some(rs) = &props.rs {
        mat.rs = rs.value;
        mat.rs_txt = rs.texture.clone();
    }

    mat.bump_txt = props.bump.clone();
    mat
}
