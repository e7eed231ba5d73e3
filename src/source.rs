//! Image sources for point colors.
//!
//! A point's color comes from the source image at its grid UV. Sources are
//! sampled through [`ImageSource`]; [`ImageTexture`] decodes PNG or JPEG
//! files with the `image` crate, and any `Fn(f32, f32) -> Vec4` works too.
//!
//! UV convention: `u = 0` is the left edge, `v = 0` the bottom edge, so
//! grid row 0 (lowest `y`) samples the bottom image row.

use crate::error::SourceError;
use glam::Vec4;
use std::path::Path;

/// Something that can be sampled for an RGBA color.
pub trait ImageSource {
    /// Color at `u, v ∈ [0, 1]`, channels in `[0, 1]`.
    fn sample_color(&self, u: f32, v: f32) -> Vec4;
}

impl<F> ImageSource for F
where
    F: Fn(f32, f32) -> Vec4,
{
    fn sample_color(&self, u: f32, v: f32) -> Vec4 {
        self(u, v)
    }
}

/// One color everywhere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidColor(pub Vec4);

impl ImageSource for SolidColor {
    fn sample_color(&self, _u: f32, _v: f32) -> Vec4 {
        self.0
    }
}

/// Decoded RGBA8 image, sampled nearest-neighbour with clamp-to-edge.
#[derive(Debug, Clone)]
pub struct ImageTexture {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl ImageTexture {
    /// Wrap raw RGBA pixel data (4 bytes per pixel, top row first).
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Result<Self, SourceError> {
        if width == 0 || height == 0 {
            return Err(SourceError::Empty);
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(SourceError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Decode an image from memory.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SourceError> {
        let img = image::load_from_memory(bytes)?.into_rgba8();
        let (width, height) = img.dimensions();
        Self::from_rgba(img.into_raw(), width, height)
    }

    /// Load and decode an image file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let texture = Self::from_bytes(&bytes)?;
        log::info!(
            "Loaded image '{}' ({}x{})",
            path.display(),
            texture.width,
            texture.height
        );
        Ok(texture)
    }

    /// Procedural fallback: a diagonal two-color gradient with a soft ring.
    pub fn gradient(width: u32, height: u32, start: [u8; 4], end: [u8; 4]) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for y in 0..height {
            for x in 0..width {
                let fx = x as f32 / (width - 1).max(1) as f32;
                let fy = y as f32 / (height - 1).max(1) as f32;
                let r = ((fx - 0.5).powi(2) + (fy - 0.5).powi(2)).sqrt();
                let ring = (1.0 - ((r - 0.3).abs() * 8.0).min(1.0)) * 0.35;
                let t = ((fx + fy) * 0.5 + ring).min(1.0);
                for c in 0..4 {
                    data.push(lerp_u8(start[c], end[c], t));
                }
            }
        }
        Self {
            data,
            width,
            height,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA pixel at integer coordinates, top row first.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let x = x.min(self.width - 1) as usize;
        let y = y.min(self.height - 1) as usize;
        let i = (y * self.width as usize + x) * 4;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }
}

impl ImageSource for ImageTexture {
    fn sample_color(&self, u: f32, v: f32) -> Vec4 {
        let u = if u.is_nan() { 0.0 } else { u.clamp(0.0, 1.0) };
        let v = if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        let x = (u * self.width as f32) as u32;
        // v grows upward, image rows grow downward
        let y = ((1.0 - v) * self.height as f32) as u32;
        let [r, g, b, a] = self.pixel(x, y);
        Vec4::new(r as f32, g as f32, b as f32, a as f32) / 255.0
    }
}

fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    let a = a as f32;
    let b = b as f32;
    (a + (b - a) * t).round() as u8
}
