use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Point in image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Point2D { x, y }
    }

    pub fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.x, self.y)
    }

    /// midpoint returns the whole-pixel midpoint of two points, rounding down.
    pub fn midpoint(a: Point2D, b: Point2D) -> Point2D {
        Point2D {
            x: ((a.x + b.x) / 2.0).floor() + 0.0,
            y: ((a.y + b.y) / 2.0).floor() + 0.0,
        }
    }
}

impl From<(f64, f64)> for Point2D {
    fn from(value: (f64, f64)) -> Self {
        Point2D::new(value.0, value.1)
    }
}

/// Dimensions of a captured frame in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        FrameSize { width, height }
    }
}

/// Landmark as produced by the pose estimator, in fractions of frame width/height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedLandmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
    #[serde(default = "default_visibility")]
    pub visibility: f32,
}

fn default_visibility() -> f32 {
    1.0
}

impl NormalizedLandmark {
    pub fn new(x: f32, y: f32) -> Self {
        NormalizedLandmark {
            x,
            y,
            z: 0.0,
            visibility: 1.0,
        }
    }

    /// to_pixel denormalizes the landmark into whole pixel coordinates.
    ///
    /// Fractions are scaled by the frame dimensions and truncated toward zero.
    /// Small negative fractions land on +0, never -0.
    ///
    /// # Arguments
    /// * `size` - FrameSize of the frame the landmark was detected on
    ///
    /// # Returns
    /// * `Point2D`
    pub fn to_pixel(&self, size: FrameSize) -> Point2D {
        Point2D {
            x: (self.x as f64 * size.width as f64).trunc() + 0.0,
            y: (self.y as f64 * size.height as f64).trunc() + 0.0,
        }
    }
}
