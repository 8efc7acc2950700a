use crate::core::geometry::vector::Vector3f;
use crate::core::imageio::{float_to_byte, Image4b};
use crate::core::texture::Texture;
use crate::textures::constant::create_constant_texture;
use std::sync::Arc;

/// One operand of the "scale" texture class: either a declared texture or a
/// constant color (floats become gray triples).
pub enum ScaleInput {
    Texture(Arc<Texture>),
    Constant(Vector3f),
}

impl ScaleInput {
    fn into_texture(self) -> Arc<Texture> {
        match self {
            ScaleInput::Texture(t) => t,
            ScaleInput::Constant(v) => Arc::new(create_constant_texture(v)),
        }
    }
}

/// Combine the two operands pixel-wise by multiplication. The output covers
/// the larger of the two images; the smaller one tiles.
pub fn create_scale_texture(tex1: ScaleInput, tex2: ScaleInput) -> Texture {
    let t1 = tex1.into_texture();
    let t2 = tex2.into_texture();

    let width = t1.width().max(t2.width()).max(1);
    let height = t1.height().max(t2.height()).max(1);

    let mut img = Image4b::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let p1 = t1.texel(x % t1.width().max(1), y % t1.height().max(1));
            let p2 = t2.texel(x % t2.width().max(1), y % t2.height().max(1));

            img.set(
                x,
                y,
                [
                    float_to_byte(p1[0] * p2[0]),
                    float_to_byte(p1[1] * p2[1]),
                    float_to_byte(p1[2] * p2[2]),
                    float_to_byte(p1[3] * p2[3]),
                ],
            );
        }
    }

    Texture::from_ldr(img)
}
