use anyhow::Error;
use tracing::{info, warn};

use crate::config::config::AppConfig;
use crate::error::WorkStudyResult;
use crate::modules::angle_sink::AngleSink;
use crate::modules::camera_select::{ActiveCamera, NO_CAMERA_INDEX};
use crate::modules::frame_source::FrameSource;
use crate::modules::pose_estimator::{PoseEstimator, PoseEstimatorFactory};
use crate::pipeline::pipeline::{run_tick, TickStatus, WorkStudyPipeline};

/// One camera with its own pose model and angle history.
///
/// Two sessions side by side (tags "A" and "B") share nothing: each owns
/// its source, estimator and series.
pub struct CameraSession<S, E> {
    pipeline: WorkStudyPipeline,
    estimator: E,
    source: Option<S>,
    selected: i32,
    status: ActiveCamera,
}

impl<S, E> CameraSession<S, E>
where
    S: FrameSource,
    E: PoseEstimator<S::Frame>,
{
    pub fn new(pipeline: WorkStudyPipeline, estimator: E) -> Self {
        CameraSession {
            pipeline,
            estimator,
            source: None,
            selected: NO_CAMERA_INDEX,
            status: ActiveCamera::None,
        }
    }

    /// from_config builds a tagged session whose estimator gets the
    /// configured detection thresholds.
    ///
    /// # Arguments
    /// * `tag` - camera name used in labels and logs, e.g. "A"
    /// * `config` - AppConfig providing graph and pose settings
    /// * `factory` - builds the session's own pose model
    ///
    /// # Returns
    /// * `WorkStudyResult<CameraSession<S, E>>`
    pub fn from_config<P>(tag: &str, config: &AppConfig, factory: &P) -> WorkStudyResult<Self>
    where
        P: PoseEstimatorFactory<S::Frame, Estimator = E>,
    {
        let estimator = factory.build(config.pose.thresholds())?;
        let pipeline = WorkStudyPipeline::from_config(config).with_tag(tag);
        Ok(Self::new(pipeline, estimator))
    }

    pub fn pipeline(&self) -> &WorkStudyPipeline {
        &self.pipeline
    }

    pub fn status(&self) -> ActiveCamera {
        self.status
    }

    pub fn selected(&self) -> i32 {
        self.selected
    }

    /// select picks the device used by the next start without touching a running capture.
    pub fn select(&mut self, index: i32) {
        self.selected = index;
    }

    pub fn is_running(&self) -> bool {
        self.source.is_some()
    }

    /// start opens the selected device.
    ///
    /// A negative selection means no device: nothing is opened and the
    /// status is `None`. An open source is released before the new one is
    /// opened. An open error or a source that is not opened gives `Failed`.
    ///
    /// # Arguments
    /// * `open` - opens the device at the given index
    ///
    /// # Returns
    /// * `ActiveCamera` status after the attempt
    pub fn start<O>(&mut self, open: O) -> ActiveCamera
    where
        O: FnOnce(i32) -> Result<S, Error>,
    {
        self.release_source();

        let index = self.selected;
        self.status = if index < 0 {
            ActiveCamera::None
        } else {
            match open(index) {
                Ok(source) if source.is_opened() => {
                    self.source = Some(source);
                    info!(camera = %self.pipeline.tag(), "started camera {index}");
                    ActiveCamera::Running(index)
                }
                Ok(mut source) => {
                    warn!(camera = %self.pipeline.tag(), "camera {index} did not open");
                    if let Err(e) = source.release() {
                        warn!("failed to release camera {index}: {e:#}");
                    }
                    ActiveCamera::Failed
                }
                Err(e) => {
                    warn!(camera = %self.pipeline.tag(), "failed to open camera {index}: {e:#}");
                    ActiveCamera::Failed
                }
            }
        };
        self.status
    }

    /// stop releases the device. The angle history is kept.
    pub fn stop(&mut self) -> ActiveCamera {
        self.release_source();
        self.status = ActiveCamera::None;
        self.status
    }

    /// on_camera_changed switches to another device.
    ///
    /// A running session is stopped, its history cleared, and restarted on
    /// the new device. An idle session only records the selection.
    pub fn on_camera_changed<O>(&mut self, index: i32, open: O) -> ActiveCamera
    where
        O: FnOnce(i32) -> Result<S, Error>,
    {
        self.selected = index;
        if !self.is_running() {
            return self.status
        }
        self.stop();
        self.pipeline.reset();
        self.start(open)
    }

    /// tick runs one cycle on the running device.
    ///
    /// Returns `None` while no device is running. A failing frame read
    /// releases the device, marks the session `Failed` and is returned.
    pub fn tick<K>(&mut self, sink: &mut K) -> WorkStudyResult<Option<TickStatus>>
    where
        K: AngleSink<S::Frame>,
    {
        let source = match self.source.as_mut() {
            Some(source) => source,
            None => return Ok(None),
        };
        match run_tick(source, &mut self.estimator, sink, &self.pipeline) {
            Ok(status) => Ok(Some(status)),
            Err(e) => {
                self.release_source();
                self.status = ActiveCamera::Failed;
                Err(e)
            }
        }
    }

    fn release_source(&mut self) {
        if let Some(mut source) = self.source.take() {
            if let Err(e) = source.release() {
                warn!(camera = %self.pipeline.tag(), "failed to release camera: {e:#}");
            }
        }
    }
}

/// start_all starts every session on its selected device.
pub fn start_all<S, E, O>(sessions: &mut [CameraSession<S, E>], mut open: O) -> Vec<ActiveCamera>
where
    S: FrameSource,
    E: PoseEstimator<S::Frame>,
    O: FnMut(i32) -> Result<S, Error>,
{
    sessions.iter_mut().map(|session| session.start(&mut open)).collect()
}

pub fn stop_all<S, E>(sessions: &mut [CameraSession<S, E>])
where
    S: FrameSource,
    E: PoseEstimator<S::Frame>,
{
    for session in sessions.iter_mut() {
        session.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use anyhow::Error;

    use crate::config::config::AppConfig;
    use crate::modules::angle_sink::{AngleSink, TickOutput};
    use crate::modules::camera_select::ActiveCamera;
    use crate::modules::frame_source::{CapturedFrame, FrameSource};
    use crate::modules::pose_estimator::{DetectionThresholds, PoseEstimator, PoseEstimatorFactory};
    use crate::modules::pose_landmark::{PoseLandmark, PoseLandmarks, POSE_LANDMARK_COUNT};
    use crate::pipeline::pipeline::TickStatus;
    use crate::pipeline::session::{start_all, stop_all, CameraSession};
    use crate::utils::coordinate::{FrameSize, NormalizedLandmark};
    use crate::WorkStudyError;

    /// Device indices released so far, shared with the test.
    type ReleaseLog = Rc<RefCell<Vec<i32>>>;

    struct FakeCamera {
        index: i32,
        opened: bool,
        fail_reads: bool,
        released: ReleaseLog,
    }

    impl FrameSource for FakeCamera {
        type Frame = i32;

        fn read_frame(&mut self) -> Result<Option<CapturedFrame<i32>>, Error> {
            if self.fail_reads {
                return Err(Error::msg("device unplugged"))
            }
            Ok(Some(CapturedFrame::new(self.index, FrameSize::new(100, 100))))
        }

        fn is_opened(&self) -> bool {
            self.opened
        }

        fn release(&mut self) -> Result<(), Error> {
            self.released.borrow_mut().push(self.index);
            Ok(())
        }
    }

    /// Always detects the left arm bent at a right angle.
    struct ArmEstimator {
        thresholds: DetectionThresholds,
    }

    impl PoseEstimator<i32> for ArmEstimator {
        fn estimate(&mut self, _frame: &i32) -> Result<Option<PoseLandmarks>, Error> {
            let mut lmks = vec![NormalizedLandmark::new(0.5, 0.5); POSE_LANDMARK_COUNT];
            lmks[PoseLandmark::LeftShoulder.index()] = NormalizedLandmark::new(0.4, 0.3);
            lmks[PoseLandmark::LeftElbow.index()] = NormalizedLandmark::new(0.4, 0.5);
            lmks[PoseLandmark::LeftWrist.index()] = NormalizedLandmark::new(0.6, 0.5);
            Ok(Some(PoseLandmarks::new(lmks)))
        }
    }

    struct ArmEstimatorFactory;

    impl PoseEstimatorFactory<i32> for ArmEstimatorFactory {
        type Estimator = ArmEstimator;

        fn build(&self, thresholds: DetectionThresholds) -> Result<ArmEstimator, Error> {
            Ok(ArmEstimator { thresholds })
        }
    }

    struct BrokenFactory;

    impl PoseEstimatorFactory<i32> for BrokenFactory {
        type Estimator = ArmEstimator;

        fn build(&self, _thresholds: DetectionThresholds) -> Result<ArmEstimator, Error> {
            Err(Error::msg("model file missing"))
        }
    }

    #[derive(Default)]
    struct CountingSink {
        frames: Vec<i32>,
    }

    impl AngleSink<i32> for CountingSink {
        fn on_tick(&mut self, output: TickOutput<'_, i32>) {
            self.frames.push(*output.frame);
        }
    }

    fn session(tag: &str) -> CameraSession<FakeCamera, ArmEstimator> {
        let mut config = AppConfig::default();
        config.graph.maxlen = 4;
        CameraSession::from_config(tag, &config, &ArmEstimatorFactory).unwrap()
    }

    fn opener(released: &ReleaseLog) -> impl FnMut(i32) -> Result<FakeCamera, Error> + '_ {
        move |index| {
            Ok(FakeCamera {
                index,
                opened: true,
                fail_reads: false,
                released: released.clone(),
            })
        }
    }

    #[test]
    fn test_from_config_passes_thresholds() {
        let mut config = AppConfig::default();
        config.pose.min_detection_confidence = 0.7;
        config.pose.min_tracking_confidence = 0.3;

        let session: CameraSession<FakeCamera, ArmEstimator> =
            CameraSession::from_config("A", &config, &ArmEstimatorFactory).unwrap();
        assert_eq!(session.estimator.thresholds, config.pose.thresholds());
        assert_eq!(session.pipeline().tag(), "A");
        assert_eq!(session.status(), ActiveCamera::None);

        let err = CameraSession::<FakeCamera, ArmEstimator>::from_config("A", &config, &BrokenFactory)
            .err()
            .unwrap();
        assert!(matches!(err, WorkStudyError::Collaborator(_)));
    }

    #[test]
    fn test_start_without_selection() {
        let mut session = session("A");
        let mut attempts = 0;
        let status = session.start(|_| {
            attempts += 1;
            Err(Error::msg("unreachable"))
        });
        assert_eq!(status, ActiveCamera::None);
        assert_eq!(attempts, 0);
        assert!(!session.is_running());
    }

    #[test]
    fn test_start_failures() {
        let released = ReleaseLog::default();
        let mut session = session("A");
        session.select(1);

        assert_eq!(session.start(|_| Err(Error::msg("busy"))), ActiveCamera::Failed);
        assert!(!session.is_running());

        let status = session.start(|index| {
            Ok(FakeCamera {
                index,
                opened: false,
                fail_reads: false,
                released: released.clone(),
            })
        });
        assert_eq!(status, ActiveCamera::Failed);
        assert_eq!(status.to_string(), "Active Camera: Failed");
        assert!(!session.is_running());
        assert_eq!(*released.borrow(), vec![1]);
    }

    #[test]
    fn test_start_tick_stop() {
        let released = ReleaseLog::default();
        let mut session = session("A");
        let mut sink = CountingSink::default();

        session.select(1);
        assert_eq!(session.start(opener(&released)), ActiveCamera::Running(1));
        assert!(matches!(session.tick(&mut sink).unwrap(), Some(TickStatus::Updated(_))));
        assert_eq!(sink.frames, vec![1]);

        assert_eq!(session.stop(), ActiveCamera::None);
        assert_eq!(*released.borrow(), vec![1]);
        assert_eq!(session.tick(&mut sink).unwrap(), None);
        // history survives a plain stop
        assert!((session.pipeline().series().snapshot().arm[3] - 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_restart_releases_previous_source() {
        let released = ReleaseLog::default();
        let mut session = session("A");
        session.select(0);
        session.start(opener(&released));
        assert_eq!(session.start(opener(&released)), ActiveCamera::Running(0));
        assert_eq!(*released.borrow(), vec![0]);
    }

    #[test]
    fn test_camera_change_restarts_and_resets() {
        let released = ReleaseLog::default();
        let mut session = session("A");
        let mut sink = CountingSink::default();

        session.select(0);
        session.start(opener(&released));
        session.tick(&mut sink).unwrap();
        assert!(session.pipeline().series().snapshot().arm.iter().any(|v| *v != 0.0));

        let status = session.on_camera_changed(2, opener(&released));
        assert_eq!(status, ActiveCamera::Running(2));
        assert_eq!(*released.borrow(), vec![0]);
        assert!(session.pipeline().series().snapshot().arm.iter().all(|v| *v == 0.0));

        session.tick(&mut sink).unwrap();
        assert_eq!(sink.frames, vec![0, 2]);
    }

    #[test]
    fn test_camera_change_while_idle_only_selects() {
        let mut session = session("A");
        let status = session.on_camera_changed(3, |_| Err(Error::msg("unreachable")));
        assert_eq!(status, ActiveCamera::None);
        assert_eq!(session.selected(), 3);
        assert!(!session.is_running());
    }

    #[test]
    fn test_read_failure_marks_failed() {
        let released = ReleaseLog::default();
        let mut session = session("A");
        session.select(0);
        session.start(|index| {
            Ok(FakeCamera {
                index,
                opened: true,
                fail_reads: true,
                released: released.clone(),
            })
        });

        let err = session.tick(&mut CountingSink::default()).unwrap_err();
        assert!(matches!(err, WorkStudyError::Collaborator(_)));
        assert_eq!(session.status(), ActiveCamera::Failed);
        assert!(!session.is_running());
        assert_eq!(*released.borrow(), vec![0]);
    }

    #[test]
    fn test_two_sessions_are_independent() {
        let released = ReleaseLog::default();
        let mut sessions = vec![session("A"), session("B")];
        sessions[0].select(0);
        sessions[1].select(1);

        let mut open = opener(&released);
        let statuses = start_all(&mut sessions, |index| {
            if index == 1 {
                return Err(Error::msg("busy"))
            }
            open(index)
        });
        assert_eq!(statuses, vec![ActiveCamera::Running(0), ActiveCamera::Failed]);

        let mut sink = CountingSink::default();
        sessions[0].tick(&mut sink).unwrap();
        assert_eq!(sessions[1].tick(&mut sink).unwrap(), None);

        let sample_a = sessions[0].pipeline().series().snapshot();
        assert!((sample_a.arm[3] - 90.0).abs() < 1e-6);
        assert!(sessions[1].pipeline().series().snapshot().arm.iter().all(|v| *v == 0.0));

        stop_all(&mut sessions);
        assert!(sessions.iter().all(|s| s.status() == ActiveCamera::None));
        assert_eq!(*released.borrow(), vec![0]);
    }
}
