use anyhow::Error;

use crate::utils::coordinate::FrameSize;

/// Frame read from a capture device together with its pixel dimensions.
#[derive(Debug, Clone)]
pub struct CapturedFrame<F> {
    pub image: F,
    pub size: FrameSize,
}

impl<F> CapturedFrame<F> {
    pub fn new(image: F, size: FrameSize) -> Self {
        CapturedFrame { image, size }
    }
}

/// Supplies one raster frame per tick.
pub trait FrameSource {
    type Frame;

    /// read_frame grabs the next frame.
    ///
    /// Returns `Ok(None)` when the device produced nothing for this tick.
    fn read_frame(&mut self) -> Result<Option<CapturedFrame<Self::Frame>>, Error>;

    fn is_opened(&self) -> bool;

    fn release(&mut self) -> Result<(), Error>;
}
