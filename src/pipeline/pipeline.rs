use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::config::config::AppConfig;
use crate::error::{WorkStudyError, WorkStudyResult};
use crate::helper::angle_helper::{angle_at_vertex, signed_tilt};
use crate::modules::angle_sink::{AngleSink, AngleUpdate, TickOutput};
use crate::modules::frame_source::FrameSource;
use crate::modules::pose_estimator::PoseEstimator;
use crate::modules::pose_landmark::{PoseLandmark, PoseLandmarks};
use crate::series::rolling_buffer::{AngleLabels, AngleSample};
use crate::series::shared::SharedSeriesBuffer;
use crate::utils::coordinate::{FrameSize, Point2D};

/// joint_angles derives the neck, arm, body and leg angles from a pose.
///
/// Uses the left side of the body. The shoulder centre is the midpoint of
/// both shoulders and serves as the neck base and the top of the trunk.
/// Returns `None` when the landmark set is incomplete.
///
/// # Arguments
/// * `landmarks` - PoseLandmarks in normalized coordinates
/// * `size` - FrameSize used to denormalize the landmarks
///
/// # Returns
/// * `Option<AngleSample>`
pub fn joint_angles(landmarks: &PoseLandmarks, size: FrameSize) -> Option<AngleSample> {
    if !landmarks.is_complete() {
        return None
    }
    let px = |landmark: PoseLandmark| landmarks.pixel(landmark, size);

    let nose = px(PoseLandmark::Nose)?;
    let left_shoulder = px(PoseLandmark::LeftShoulder)?;
    let right_shoulder = px(PoseLandmark::RightShoulder)?;
    let shoulder_center = Point2D::midpoint(left_shoulder, right_shoulder);

    let elbow = px(PoseLandmark::LeftElbow)?;
    let wrist = px(PoseLandmark::LeftWrist)?;
    let hip = px(PoseLandmark::LeftHip)?;
    let knee = px(PoseLandmark::LeftKnee)?;
    let ankle = px(PoseLandmark::LeftAnkle)?;

    Some(AngleSample {
        neck: angle_at_vertex(left_shoulder, shoulder_center, nose),
        arm: angle_at_vertex(left_shoulder, elbow, wrist),
        body: signed_tilt(hip, shoulder_center),
        leg: angle_at_vertex(hip, knee, ankle),
    })
}

/// Turns per-tick detections into angle samples and keeps their history.
#[derive(Debug, Clone)]
pub struct WorkStudyPipeline {
    tag: String,
    series: SharedSeriesBuffer,
}

impl WorkStudyPipeline {

    /// new initializes new instance of the pipeline
    pub fn new(series: SharedSeriesBuffer) -> Self {
        WorkStudyPipeline {
            tag: String::new(),
            series,
        }
    }

    /// with_tag names the camera this pipeline belongs to, e.g. "A".
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// labels renders the sample labels carrying this pipeline's camera tag.
    pub fn labels(&self, sample: &AngleSample) -> AngleLabels {
        sample.labels_for(&self.tag)
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(SharedSeriesBuffer::new(config.graph.build_buffer()))
    }

    /// series returns a handle for readers on other threads.
    pub fn series(&self) -> SharedSeriesBuffer {
        self.series.clone()
    }

    /// process_tick computes the angles for one tick and records them.
    ///
    /// A tick without a complete landmark set is skipped and the history is
    /// left untouched.
    ///
    /// # Arguments
    /// * `landmarks` - Option<&PoseLandmarks> from the pose estimator
    /// * `size` - FrameSize of the processed frame
    ///
    /// # Returns
    /// * `Option<AngleUpdate>`
    pub fn process_tick(&self, landmarks: Option<&PoseLandmarks>, size: FrameSize) -> Option<AngleUpdate> {
        let landmarks = match landmarks {
            Some(landmarks) => landmarks,
            None => {
                debug!("no pose detected, skipping tick");
                return None
            }
        };

        let sample = match joint_angles(landmarks, size) {
            Some(sample) => sample,
            None => {
                debug!("partial landmark set ({} points), skipping tick", landmarks.len());
                return None
            }
        };

        let series = self.series.push_and_snapshot(sample);
        debug!(
            camera = %self.tag,
            neck = sample.neck,
            arm = sample.arm,
            body = sample.body,
            leg = sample.leg,
            "angles updated"
        );
        Some(AngleUpdate { sample, series })
    }

    /// reset clears the history, e.g. when the capture session restarts.
    pub fn reset(&self) {
        self.series.clear();
    }
}

/// Outcome of a single tick
#[derive(Debug, Clone, PartialEq)]
pub enum TickStatus {
    NoFrame,
    NoPose,
    EstimatorFailed,
    Updated(AngleSample),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub ticks: u64,
    pub updates: u64,
    pub skipped: u64,
}

/// run_tick runs one capture/estimate/render cycle.
///
/// Only a failing frame read is returned as an error; an estimator
/// failure is logged and the tick is skipped.
pub fn run_tick<S, E, K>(
    source: &mut S,
    estimator: &mut E,
    sink: &mut K,
    pipeline: &WorkStudyPipeline,
) -> WorkStudyResult<TickStatus>
where
    S: FrameSource,
    E: PoseEstimator<S::Frame>,
    K: AngleSink<S::Frame>,
{
    let frame = match source.read_frame()? {
        Some(frame) => frame,
        None => {
            warn!("camera returned no frame");
            return Ok(TickStatus::NoFrame)
        }
    };

    let (landmarks, failed) = match estimator.estimate(&frame.image) {
        Ok(landmarks) => (landmarks, false),
        Err(e) => {
            warn!("pose estimation failed: {e:#}");
            (None, true)
        }
    };

    let update = pipeline.process_tick(landmarks.as_ref(), frame.size);
    let status = match (&update, failed) {
        (Some(update), _) => TickStatus::Updated(update.sample),
        (None, true) => TickStatus::EstimatorFailed,
        (None, false) => TickStatus::NoPose,
    };

    sink.on_tick(TickOutput {
        frame: &frame.image,
        landmarks: landmarks.as_ref(),
        update,
    });

    Ok(status)
}

/// Drives FrameSource -> PoseEstimator -> angles -> AngleSink at a fixed cadence.
pub struct TickRunner<S, E, K> {
    source: S,
    estimator: E,
    sink: K,
    pipeline: WorkStudyPipeline,
    interval: Duration,
}

impl<S, E, K> TickRunner<S, E, K>
where
    S: FrameSource,
    E: PoseEstimator<S::Frame>,
    K: AngleSink<S::Frame>,
{
    pub fn new(source: S, estimator: E, sink: K, pipeline: WorkStudyPipeline, interval: Duration) -> Self {
        TickRunner {
            source,
            estimator,
            sink,
            pipeline,
            interval,
        }
    }

    pub fn pipeline(&self) -> &WorkStudyPipeline {
        &self.pipeline
    }

    /// tick runs one capture/estimate/render cycle.
    pub fn tick(&mut self) -> WorkStudyResult<TickStatus> {
        run_tick(&mut self.source, &mut self.estimator, &mut self.sink, &self.pipeline)
    }

    /// run ticks until `stop` turns true or its sender is dropped, then
    /// releases the frame source. Fails up front if the source is not open.
    pub async fn run(mut self, mut stop: watch::Receiver<bool>) -> WorkStudyResult<RunSummary> {
        if !self.source.is_opened() {
            return Err(WorkStudyError::Camera("frame source is not opened".to_string()))
        }
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut summary = RunSummary::default();

        info!("capture loop started, interval {:?}", self.interval);
        let result = loop {
            if *stop.borrow() {
                break Ok(())
            }
            tokio::select! {
                biased;
                changed = stop.changed() => {
                    if changed.is_err() {
                        break Ok(())
                    }
                }
                _ = ticker.tick() => {
                    match self.tick() {
                        Ok(status) => {
                            summary.ticks += 1;
                            match status {
                                TickStatus::Updated(_) => summary.updates += 1,
                                _ => summary.skipped += 1,
                            }
                        }
                        Err(e) => break Err(e),
                    }
                }
            }
        };

        self.source.release()?;
        info!(
            ticks = summary.ticks,
            updates = summary.updates,
            skipped = summary.skipped,
            "capture loop stopped"
        );
        result.map(|_| summary)
    }
}
