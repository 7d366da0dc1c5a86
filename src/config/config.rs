use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{WorkStudyError, WorkStudyResult};
use crate::modules::pose_estimator::DetectionThresholds;
use crate::series::rolling_buffer::{RollingSeriesBuffer, DEFAULT_CAPACITY};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub frame_width: i32,
    pub frame_height: i32,
    pub max_probe_index: i32,
    pub tick_interval_ms: u64,
}

impl CameraConfig {
    pub(crate) fn new() -> Self {
        CameraConfig {
            frame_width: 640,
            frame_height: 480,
            max_probe_index: 10,
            tick_interval_ms: 30,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PoseConfig {
    pub min_detection_confidence: f32,
    pub min_tracking_confidence: f32,
}

impl PoseConfig {
    pub(crate) fn new() -> Self {
        PoseConfig {
            min_detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
        }
    }

    pub fn thresholds(&self) -> DetectionThresholds {
        DetectionThresholds {
            min_detection_confidence: self.min_detection_confidence,
            min_tracking_confidence: self.min_tracking_confidence,
        }
    }
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GraphConfig {
    pub maxlen: usize,
    pub fill_value: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl GraphConfig {
    pub(crate) fn new() -> Self {
        GraphConfig {
            maxlen: DEFAULT_CAPACITY,
            fill_value: 0.0,
            y_min: 0.0,
            y_max: 180.0,
        }
    }

    pub fn build_buffer(&self) -> RollingSeriesBuffer {
        RollingSeriesBuffer::with_fill(self.maxlen, self.fill_value)
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    pub camera: CameraConfig,
    pub pose: PoseConfig,
    pub graph: GraphConfig,
    pub log_level: LogLevel,
}

impl AppConfig {
    /// load reads a JSON config file. Missing fields take their defaults.
    ///
    /// # Arguments
    /// * `path` - path to the JSON file
    ///
    /// # Returns
    /// * `WorkStudyResult<AppConfig>`
    pub fn load<P: AsRef<Path>>(path: P) -> WorkStudyResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&content)?;
        info!("loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn from_json(content: &str) -> WorkStudyResult<Self> {
        let config: AppConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> WorkStudyResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> WorkStudyResult<()> {
        if self.camera.tick_interval_ms == 0 {
            return Err(WorkStudyError::Config("tick_interval_ms must be greater than 0".to_string()))
        }
        if self.camera.frame_width <= 0 || self.camera.frame_height <= 0 {
            return Err(WorkStudyError::Config("frame size must be positive".to_string()))
        }
        if self.graph.y_min >= self.graph.y_max {
            return Err(WorkStudyError::Config(format!(
                "graph y range is empty: {} >= {}",
                self.graph.y_min, self.graph.y_max
            )))
        }
        for (name, value) in [
            ("min_detection_confidence", self.pose.min_detection_confidence),
            ("min_tracking_confidence", self.pose.min_tracking_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(WorkStudyError::Config(format!("{name} must be within [0, 1], got {value}")))
            }
        }
        Ok(())
    }
}
