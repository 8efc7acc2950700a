use crate::core::geometry::vector::Vector3f;
use crate::core::imageio::{float_to_byte, Image4b};
use crate::core::texture::Texture;

const CHECKER_SIZE: usize = 128;
const TILE_SIZE: usize = 64;

/// A 128x128 checker image alternating the two colors in 64-pixel tiles.
pub fn create_checkerboard_texture(tex1: Vector3f, tex2: Vector3f) -> Texture {
    let mut img = Image4b::new(CHECKER_SIZE, CHECKER_SIZE);

    let c1 = [
        float_to_byte(tex1.x),
        float_to_byte(tex1.y),
        float_to_byte(tex1.z),
        255,
    ];
    let c2 = [
        float_to_byte(tex2.x),
        float_to_byte(tex2.y),
        float_to_byte(tex2.z),
        255,
    ];

    for y in 0..CHECKER_SIZE {
        for x in 0..CHECKER_SIZE {
            let c = if (x / TILE_SIZE + y / TILE_SIZE) % 2 == 0 {
                c1
            } else {
                c2
            };
            img.set(x, y, c);
        }
    }

    Texture::from_ldr(img)
}
