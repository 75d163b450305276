use std::f64::consts::PI;

use crate::foundation::core::{Rgb8, Vec3};

/// Perspective camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// Vertical field of view in degrees.
    pub fov_deg: f64,
    /// Near plane distance.
    pub near: f64,
    /// Far plane distance.
    pub far: f64,
    /// Camera position; the camera looks down `-z`.
    pub position: Vec3,
}

impl Camera {
    /// World units covered by the full viewport height at depth `z`.
    pub fn visible_height_at(&self, z: f64) -> f64 {
        let distance = (self.position.z - z).abs().max(self.near);
        2.0 * distance * (self.fov_deg.to_radians() / 2.0).tan()
    }
}

/// How a model is normalized and placed in front of the camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelFit {
    /// Target size of the model's largest bounds extent.
    pub scale_factor: f64,
    /// Position (or offset from the recentered position, per axis).
    pub offset: Vec3,
    /// Per axis: subtract the bounds center from `offset`.
    pub recenter: [bool; 3],
    /// Euler rotation in radians.
    pub rotation: Vec3,
}

/// Viewport, camera and model fit for one kind of rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewSetup {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Background color.
    pub clear: Rgb8,
    /// Camera.
    pub camera: Camera,
    /// Model placement.
    pub fit: ModelFit,
}

/// Gallery card background.
pub const THUMBNAIL_CLEAR: Rgb8 = Rgb8::new(0xf8, 0xf5, 0xec);
/// Gallery card surface width.
pub const THUMBNAIL_WIDTH: u32 = 260;
/// Gallery card surface height.
pub const THUMBNAIL_HEIGHT: u32 = 240;

impl ViewSetup {
    /// Gallery thumbnail: 260×240 on cream, camera at `(0, 0.6, 2)`, model scaled to 2.2 and
    /// turned a little towards the viewer.
    pub fn thumbnail() -> Self {
        Self {
            width: THUMBNAIL_WIDTH,
            height: THUMBNAIL_HEIGHT,
            clear: THUMBNAIL_CLEAR,
            camera: Camera {
                fov_deg: 45.0,
                near: 0.1,
                far: 100.0,
                position: Vec3::new(0.0, 0.6, 2.0),
            },
            fit: ModelFit {
                scale_factor: 2.2,
                offset: Vec3::new(0.0, 0.2, -0.6),
                recenter: [false; 3],
                rotation: Vec3::new(PI / 12.0, PI / 6.0, 0.0),
            },
        }
    }

    /// Configurator preview of arbitrary size: model scaled to 1.5, shifted left and
    /// recentered vertically and in depth.
    pub fn configurator(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            clear: Rgb8::new(0xff, 0xff, 0xff),
            camera: Camera {
                fov_deg: 45.0,
                near: 0.1,
                far: 1000.0,
                position: Vec3::new(0.0, 0.8, 2.5),
            },
            fit: ModelFit {
                scale_factor: 1.5,
                offset: Vec3::new(-1.0, 0.15, 0.0),
                recenter: [false, true, true],
                rotation: Vec3::new(0.0, PI / 6.0, 0.0),
            },
        }
    }

    /// Viewport aspect ratio.
    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height.max(1))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/view.rs"]
mod tests;
