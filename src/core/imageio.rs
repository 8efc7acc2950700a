use crate::core::pbrt::{clamp, Float};
use anyhow::{Context, Result};
use std::path::Path;

/// Pixel buffers produced by the external image decoder. The rest of the
/// crate only ever sees these two types; the `image` crate stays behind
/// this module.

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Image4b {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<[u8; 4]>,
}

impl Image4b {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0, 0, 0, 255]; width * height],
        }
    }

    pub fn at(&self, x: usize, y: usize) -> [u8; 4] {
        self.pixels[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, p: [u8; 4]) {
        self.pixels[y * self.width + x] = p;
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Image4f {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<[Float; 4]>,
}

impl Image4f {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0.0, 0.0, 0.0, 1.0]; width * height],
        }
    }

    pub fn at(&self, x: usize, y: usize) -> [Float; 4] {
        self.pixels[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, p: [Float; 4]) {
        self.pixels[y * self.width + x] = p;
    }
}

#[inline]
pub fn float_to_byte(v: Float) -> u8 {
    (clamp(v, 0.0, 1.0) * 255.0 + 0.5) as u8
}

#[inline]
pub fn byte_to_float(b: u8) -> Float {
    b as Float / 255.0
}

/// Load an 8-bit RGBA image (the LDR path).
pub fn load_image4b<P: AsRef<Path>>(name: P) -> Result<Image4b> {
    let name = name.as_ref();
    let img = image::open(name)
        .with_context(|| format!("Failed to load image \"{}\"", name.display()))?
        .to_rgba8();

    let (width, height) = (img.width() as usize, img.height() as usize);
    let pixels = img.pixels().map(|p| p.0).collect();

    Ok(Image4b {
        width,
        height,
        pixels,
    })
}

/// Load a floating-point RGBA image (the HDR path, for .exr and .hdr files).
pub fn load_image4f<P: AsRef<Path>>(name: P) -> Result<Image4f> {
    let name = name.as_ref();
    let img = image::open(name)
        .with_context(|| format!("Failed to load image \"{}\"", name.display()))?
        .to_rgba32f();

    let (width, height) = (img.width() as usize, img.height() as usize);
    let pixels = img.pixels().map(|p| p.0).collect();

    Ok(Image4f {
        width,
        height,
        pixels,
    })
}
