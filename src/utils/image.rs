use anyhow::Error;
use opencv::core::{Mat, MatTraitConst};
use opencv::imgproc::{cvt_color, COLOR_BGR2RGB};

use crate::utils::coordinate::FrameSize;

/// bgr_to_rgb converts a captured BGR frame into the RGB layout pose models expect.
pub fn bgr_to_rgb(frame: &Mat) -> Result<Mat, Error> {
    let mut rgb = Mat::default();
    cvt_color(frame, &mut rgb, COLOR_BGR2RGB, 0)?;
    Ok(rgb)
}

pub fn frame_size(frame: &Mat) -> FrameSize {
    FrameSize {
        width: frame.cols().max(0) as u32,
        height: frame.rows().max(0) as u32,
    }
}
