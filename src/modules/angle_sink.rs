use crate::modules::pose_landmark::PoseLandmarks;
use crate::series::rolling_buffer::{AngleSample, SeriesSnapshot};

/// Everything the display needs after one tick.
#[derive(Debug, Clone)]
pub struct TickOutput<'a, F> {
    pub frame: &'a F,
    pub landmarks: Option<&'a PoseLandmarks>,
    /// Present only when the pose was detected this tick
    pub update: Option<AngleUpdate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AngleUpdate {
    pub sample: AngleSample,
    pub series: SeriesSnapshot,
}

/// Presentation side of the pipeline: video label, angle labels and chart.
pub trait AngleSink<F> {
    fn on_tick(&mut self, output: TickOutput<'_, F>);
}
