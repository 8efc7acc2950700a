use crate::core::imageio::{byte_to_float, Image4b, Image4f};
use crate::core::pbrt::Float;

/// An image-backed texture in the output scene. Exactly one of the two pixel
/// buffers is populated: `ldr` for 8-bit images, `hdr` for floating-point
/// ones (.exr / .hdr sources).
#[derive(Debug, Default, Clone)]
pub struct Texture {
    pub name: String,
    pub path: String,
    pub ldr: Option<Image4b>,
    pub hdr: Option<Image4f>,
}

impl Texture {
    pub fn from_ldr(ldr: Image4b) -> Self {
        Self {
            ldr: Some(ldr),
            ..Default::default()
        }
    }

    pub fn from_hdr(hdr: Image4f) -> Self {
        Self {
            hdr: Some(hdr),
            ..Default::default()
        }
    }

    pub fn width(&self) -> usize {
        match (&self.ldr, &self.hdr) {
            (Some(img), _) => img.width,
            (_, Some(img)) => img.width,
            _ => 0,
        }
    }

    pub fn height(&self) -> usize {
        match (&self.ldr, &self.hdr) {
            (Some(img), _) => img.height,
            (_, Some(img)) => img.height,
            _ => 0,
        }
    }

    /// Texel fetch as floats regardless of the backing representation.
    pub fn texel(&self, x: usize, y: usize) -> [Float; 4] {
        match (&self.ldr, &self.hdr) {
            (Some(img), _) => {
                let p = img.at(x, y);
                [
                    byte_to_float(p[0]),
                    byte_to_float(p[1]),
                    byte_to_float(p[2]),
                    byte_to_float(p[3]),
                ]
            }
            (_, Some(img)) => img.at(x, y),
            _ => [0.0, 0.0, 0.0, 1.0],
        }
    }
}
