use std::sync::Arc;

use xxhash_rust::xxh3::Xxh3;

use crate::foundation::error::{FlavorError, FlavorResult};

pub use kurbo::Affine;

/// Opaque sRGB color with 8-bit channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Construct from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb` or `#rrggbb` (case-insensitive). Returns `None` for anything else.
    pub fn parse_hex(s: &str) -> Option<Self> {
        let digits = s.trim().strip_prefix('#')?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        fn hex_byte(pair: &str) -> Option<u8> {
            u8::from_str_radix(pair, 16).ok()
        }

        match digits.len() {
            3 => {
                let mut ch = [0u8; 3];
                for (i, c) in digits.chars().enumerate() {
                    let v = c.to_digit(16)? as u8;
                    ch[i] = v * 17;
                }
                Some(Self::new(ch[0], ch[1], ch[2]))
            }
            6 => Some(Self::new(
                hex_byte(&digits[0..2])?,
                hex_byte(&digits[2..4])?,
                hex_byte(&digits[4..6])?,
            )),
            _ => None,
        }
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Fully opaque RGBA8 (premultiplied and straight are identical at alpha 255).
    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }

    /// Multiply each channel by `k` (clamped to `0..=1`).
    pub fn scaled(self, k: f64) -> Self {
        let k = k.clamp(0.0, 1.0);
        let f = |c: u8| ((f64::from(c) * k).round()).clamp(0.0, 255.0) as u8;
        Self::new(f(self.r), f(self.g), f(self.b))
    }
}

impl std::fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Minimal 3-component vector for scene placement.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// Construct from components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Largest component.
    pub fn max_component(self) -> f64 {
        self.x.max(self.y).max(self.z)
    }
}

/// Raster image in premultiplied RGBA8, row-major, tightly packed.
///
/// Pixel storage is shared: cloning a `RasterImage` is cheap.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("fingerprint", &format_args!("{:016x}", self.fingerprint()))
            .finish()
    }
}

impl RasterImage {
    /// Fully transparent image of the given size.
    pub fn transparent(width: u32, height: u32) -> Self {
        let len = (width as usize) * (height as usize) * 4;
        Self {
            width,
            height,
            rgba8_premul: Arc::new(vec![0u8; len]),
        }
    }

    /// Wrap premultiplied bytes, validating the buffer length.
    pub fn from_premul(width: u32, height: u32, bytes: Vec<u8>) -> FlavorResult<Self> {
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        if bytes.len() != expected {
            return Err(FlavorError::validation(format!(
                "raster byte len mismatch: got {}, expected {expected} for {width}x{height}",
                bytes.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(bytes),
        })
    }

    /// Premultiplied pixel at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = &self.rgba8_premul[i..i + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// `true` when every pixel has zero alpha.
    pub fn is_fully_transparent(&self) -> bool {
        self.rgba8_premul.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Stable 64-bit fingerprint over dimensions and pixel bytes.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Xxh3::new();
        h.update(&self.width.to_le_bytes());
        h.update(&self.height.to_le_bytes());
        h.update(&self.rgba8_premul);
        h.digest()
    }

    /// Convert to a straight-alpha [`image::RgbaImage`] (for PNG output).
    pub fn to_straight_rgba(&self) -> FlavorResult<image::RgbaImage> {
        let mut bytes = self.rgba8_premul.as_ref().clone();
        unpremultiply_rgba8_in_place(&mut bytes);
        image::RgbaImage::from_raw(self.width, self.height, bytes)
            .ok_or_else(|| FlavorError::validation("raster buffer does not match dimensions"))
    }
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[0..3] {
            *c = ((*c as u16 * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
