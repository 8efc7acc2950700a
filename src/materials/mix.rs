use crate::core::geometry::vector::Vector3f;
use crate::core::imageio::{float_to_byte, Image4b};
use crate::core::material::Material;
use crate::core::pbrt::Float;
use crate::core::scene::{CounterId, IdGenerator, Scene};
use crate::core::texture::Texture;
use crate::materials::MaterialProps;
use std::sync::Arc;

/// Blend two named materials. Every scalar and vector field of the result is
/// `f1 * amount + f2 * (1 - amount)`; texture fields blend pixel-wise with
/// mutual tiling, and newly produced blend images are added to the scene's
/// texture list.
pub fn create_mix_material(
    props: &MaterialProps,
    mat1: &Material,
    mat2: &Material,
    scene: &mut Scene,
    ids: &mut IdGenerator,
) -> Material {
    let amount = props.amount.unwrap_or(0.5);

    let mut mat = Material {
        kd: mat1.kd * amount + mat2.kd * (1.0 - amount),
        kr: mat1.kr * amount + mat2.kr * (1.0 - amount),
        ks: mat1.ks * amount + mat2.ks * (1.0 - amount),
        kt: mat1.kt * amount + mat2.kt * (1.0 - amount),
        rs: mat1.rs * amount + mat2.rs * (1.0 - amount),
        op: mat1.op * amount + mat2.op * (1.0 - amount),
        ..Default::default()
    };

    mat.kd_txt = blend_textures(&mat1.kd_txt, &mat2.kd_txt, amount, scene, ids);
    mat.kr_txt = blend_textures(&mat1.kr_txt, &mat2.kr_txt, amount, scene, ids);
    mat.ks_txt = blend_textures(&mat1.ks_txt, &mat2.ks_txt, amount, scene, ids);
    mat.kt_txt = blend_textures(&mat1.kt_txt, &mat2.kt_txt, amount, scene, ids);
    mat.rs_txt = blend_textures(&mat1.rs_txt, &mat2.rs_txt, amount, scene, ids);
    mat.bump_txt = blend_textures(&mat1.bump_txt, &mat2.bump_txt, amount, scene, ids);
    mat.disp_txt = blend_textures(&mat1.disp_txt, &mat2.disp_txt, amount, scene, ids);
    mat.norm_txt = blend_textures(&mat1.norm_txt, &mat2.norm_txt, amount, scene, ids);

    if props.bump.is_some() {
        mat.bump_txt = props.bump.clone();
    }

    mat
}

fn blend_pixel(p1: [Float; 4], p2: [Float; 4], amount: Float) -> [u8; 4] {
    let mut out = [0u8; 4];
    for (o, (a, b)) in out.iter_mut().zip(p1.iter().zip(p2.iter())) {
        *o = float_to_byte(a * amount + b * (1.0 - amount));
    }
    out
}

/// Pixel-wise blend of two optional textures. With both sides present the
/// smaller image tiles across the larger; with one side present its pixels
/// are scaled by `1 - amount`; with neither, there is no result texture.
fn blend_textures(
    txt1: &Option<Arc<Texture>>,
    txt2: &Option<Arc<Texture>>,
    amount: Float,
    scene: &mut Scene,
    ids: &mut IdGenerator,
) -> Option<Arc<Texture>> {
    let scale_single = |txt: &Arc<Texture>| -> Texture {
        let (width, height) = (txt.width().max(1), txt.height().max(1));
        let mut img = Image4b::new(width, height);

        for y in 0..height {
            for x in 0..width {
                let p = txt.texel(x, y);
                img.set(
                    x,
                    y,
                    [
                        float_to_byte(p[0] * (1.0 - amount)),
                        float_to_byte(p[1] * (1.0 - amount)),
                        float_to_byte(p[2] * (1.0 - amount)),
                        float_to_byte(p[3] * (1.0 - amount)),
                    ],
                );
            }
        }

        Texture::from_ldr(img)
    };

    let mut txt = match (txt1, txt2) {
        (None, None) => return None,
        (None, Some(t2)) => scale_single(t2),
        (Some(t1), None) => scale_single(t1),
        (Some(t1), Some(t2)) => {
            let width = t1.width().max(t2.width()).max(1);
            let height = t1.height().max(t2.height()).max(1);
            let mut img = Image4b::new(width, height);

            for y in 0..height {
                for x in 0..width {
                    let p1 = t1.texel(x % t1.width().max(1), y % t1.height().max(1));
                    let p2 = t2.texel(x % t2.width().max(1), y % t2.height().max(1));
                    img.set(x, y, blend_pixel(p1, p2, amount));
                }
            }

            Texture::from_ldr(img)
        }
    };

    txt.name = ids.fresh(CounterId::Texture);
    txt.path = format!("{}.png", txt.name);

    let txt = Arc::new(txt);
    scene.textures.push(txt.clone());
    Some(txt)
}

/// Fold an rgb amount down to the scalar blend weight.
pub fn amount_from_rgb(rgb: Vector3f) -> Float {
    (rgb.x + rgb.y + rgb.z) / 3.0
}
