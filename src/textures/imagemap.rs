use crate::core::fileutil::has_extension;
use crate::core::imageio::{load_image4b, load_image4f};
use crate::core::texture::Texture;
use anyhow::Result;

/// Build a texture from an image file. ".exr" and ".hdr" files take the
/// floating-point path; every other suffix is decoded as an 8-bit image.
pub fn create_imagemap_texture(filename: &str) -> Result<Texture> {
    let mut txt = if has_extension(filename, "exr") || has_extension(filename, "hdr") {
        Texture::from_hdr(load_image4f(filename)?)
    } else {
        Texture::from_ldr(load_image4b(filename)?)
    };

    txt.path = filename.to_owned();
    Ok(txt)
}
