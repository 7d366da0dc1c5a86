use anyhow::Error;

use crate::modules::pose_landmark::PoseLandmarks;

/// Thresholds handed to a pose model when it is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionThresholds {
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
}

/// Runs a pose model over a frame.
pub trait PoseEstimator<F> {
    /// estimate returns the landmark set for the frame, or `None` when no
    /// body was detected.
    fn estimate(&mut self, frame: &F) -> Result<Option<PoseLandmarks>, Error>;
}

/// Builds a pose model configured with the detection thresholds.
///
/// Each camera session builds its own estimator, since a tracking model
/// keeps state between frames.
pub trait PoseEstimatorFactory<F> {
    type Estimator: PoseEstimator<F>;

    fn build(&self, thresholds: DetectionThresholds) -> Result<Self::Estimator, Error>;
}

impl<F, T> PoseEstimator<F> for Box<T>
where
    T: PoseEstimator<F> + ?Sized,
{
    fn estimate(&mut self, frame: &F) -> Result<Option<PoseLandmarks>, Error> {
        (**self).estimate(frame)
    }
}
