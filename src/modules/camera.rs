use anyhow::{bail, Error};
use opencv::core::{Mat, MatTraitConst};
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};
use tracing::{debug, info};

use crate::config::config::CameraConfig;
use crate::modules::camera_select::{list_cameras, CameraChoice};
use crate::modules::frame_source::{CapturedFrame, FrameSource};
use crate::utils::image::frame_size;

/// Webcam backed by an OpenCV capture device. Frames are BGR.
pub struct CameraModule {
    capture: VideoCapture,
    index: i32,
}

impl CameraModule {

    /// open opens the device at `index` and requests the configured frame size.
    ///
    /// # Arguments
    /// * `index` - device index as listed by `probe_cameras`
    /// * `config` - CameraConfig
    ///
    /// # Returns
    /// * `Result<CameraModule, Error>`
    pub fn open(index: i32, config: &CameraConfig) -> Result<Self, Error> {
        if index < 0 {
            bail!("camera - invalid device index {index}")
        }
        let mut capture = VideoCapture::new(index, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            bail!("camera - failed to open device {index}")
        }
        capture.set(videoio::CAP_PROP_FRAME_WIDTH, config.frame_width as f64)?;
        capture.set(videoio::CAP_PROP_FRAME_HEIGHT, config.frame_height as f64)?;
        info!("opened camera {index}");

        Ok(CameraModule { capture, index })
    }

    pub fn index(&self) -> i32 {
        self.index
    }
}

impl FrameSource for CameraModule {
    type Frame = Mat;

    fn read_frame(&mut self) -> Result<Option<CapturedFrame<Mat>>, Error> {
        let mut frame = Mat::default();
        let grabbed = self.capture.read(&mut frame)?;
        if !grabbed || frame.empty() {
            return Ok(None)
        }
        let size = frame_size(&frame);
        Ok(Some(CapturedFrame::new(frame, size)))
    }

    fn is_opened(&self) -> bool {
        self.capture.is_opened().unwrap_or(false)
    }

    fn release(&mut self) -> Result<(), Error> {
        self.capture.release()?;
        debug!("released camera {}", self.index);
        Ok(())
    }
}

/// probe_cameras lists the devices that can be opened, releasing each probe.
pub fn probe_cameras(config: &CameraConfig) -> Vec<CameraChoice> {
    list_cameras(config.max_probe_index, |index| {
        match VideoCapture::new(index, videoio::CAP_ANY) {
            Ok(mut capture) => {
                let opened = capture.is_opened().unwrap_or(false);
                let _ = capture.release();
                opened
            }
            Err(_) => false,
        }
    })
}
