use anyhow::Error;
use opencv::core::{Mat, Point, Scalar};
use opencv::imgproc::{circle, line, LINE_8};

use crate::modules::pose_landmark::{PoseLandmarks, POSE_CONNECTIONS};
use crate::utils::coordinate::{FrameSize, NormalizedLandmark};
use crate::utils::image::frame_size;

/// Landmarks below this visibility are not drawn
pub const VISIBILITY_THRESHOLD: f32 = 0.5;

/// Colour and stroke of one overlay element, BGR.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawingSpec {
    pub color: (f64, f64, f64),
    pub thickness: i32,
    pub circle_radius: i32,
}

impl DrawingSpec {
    pub fn landmark() -> Self {
        DrawingSpec {
            color: (0.0, 255.0, 0.0),
            thickness: 3,
            circle_radius: 3,
        }
    }

    pub fn connection() -> Self {
        DrawingSpec {
            color: (0.0, 0.0, 255.0),
            thickness: 2,
            circle_radius: 2,
        }
    }

    fn scalar(&self) -> Scalar {
        Scalar::new(self.color.0, self.color.1, self.color.2, 0.0)
    }
}

fn to_point(landmark: &NormalizedLandmark, size: FrameSize) -> Point {
    let p = landmark.to_pixel(size);
    Point::new(p.x as i32, p.y as i32)
}

/// draw_landmarks paints the skeleton onto a BGR frame in place.
///
/// Connections are drawn first so the landmark dots stay on top.
pub fn draw_landmarks(
    frame: &mut Mat,
    landmarks: &PoseLandmarks,
    landmark_spec: DrawingSpec,
    connection_spec: DrawingSpec,
) -> Result<(), Error> {
    let size = frame_size(frame);
    let visible = |lmk: &&NormalizedLandmark| lmk.visibility >= VISIBILITY_THRESHOLD;

    for (a, b) in POSE_CONNECTIONS {
        let (Some(start), Some(end)) = (
            landmarks.get(a).filter(visible),
            landmarks.get(b).filter(visible),
        ) else {
            continue;
        };
        line(
            frame,
            to_point(start, size),
            to_point(end, size),
            connection_spec.scalar(),
            connection_spec.thickness,
            LINE_8,
            0,
        )?;
    }

    for lmk in landmarks.iter().filter(|lmk| lmk.visibility >= VISIBILITY_THRESHOLD) {
        circle(
            frame,
            to_point(lmk, size),
            landmark_spec.circle_radius,
            landmark_spec.scalar(),
            landmark_spec.thickness,
            LINE_8,
            0,
        )?;
    }
    Ok(())
}
