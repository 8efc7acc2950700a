use crate::core::geometry::vector::Vector3f;
use crate::core::imageio::{float_to_byte, Image4b};
use crate::core::texture::Texture;

/// A 1x1 image of the given color, for "constant" textures and for scalar
/// operands of the "scale" texture class.
pub fn create_constant_texture(value: Vector3f) -> Texture {
    let mut img = Image4b::new(1, 1);
    img.set(
        0,
        0,
        [
            float_to_byte(value.x),
            float_to_byte(value.y),
            float_to_byte(value.z),
            255,
        ],
    );

    Texture::from_ldr(img)
}
