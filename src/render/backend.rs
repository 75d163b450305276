use crate::foundation::core::RasterImage;
use crate::foundation::error::{FlavorError, FlavorResult};
use crate::scene::binder::BoundSlots;
use crate::scene::graph::ModelInstance;
use crate::scene::view::ViewSetup;

/// Rendered surface read back as RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8 bytes.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)` as stored.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data.get(i..i + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// Convert into a premultiplied [`RasterImage`].
    pub fn into_raster(self) -> FlavorResult<RasterImage> {
        if !self.premultiplied {
            return Err(FlavorError::render(
                "frame must be premultiplied to become a raster image",
            ));
        }
        RasterImage::from_premul(self.width, self.height, self.data)
    }
}

/// Bound model instance handed to a renderer.
#[derive(Clone, Copy, Debug)]
pub struct RenderScene<'a> {
    /// Model instance with materials applied.
    pub instance: &'a ModelInstance,
    /// Slots located by the binder.
    pub slots: &'a BoundSlots,
}

/// Draws a bound model into a new surface.
///
/// Shared by every render task, so implementations must be thread-safe and must not keep
/// per-call state.
pub trait SceneRenderer: Send + Sync {
    /// Render `scene` with the camera and viewport of `view`.
    fn render(&self, scene: RenderScene<'_>, view: &ViewSetup) -> FlavorResult<FrameRGBA>;
}
