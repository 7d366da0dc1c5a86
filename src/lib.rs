pub mod utils;
pub mod helper;
pub mod series;
pub mod pipeline;
pub mod config;
pub mod modules;
pub mod error;
pub mod logging;

pub use error::{WorkStudyError, WorkStudyResult};
pub use helper::angle_helper::{angle_at_vertex, distance, signed_tilt, try_angle_at_vertex};
pub use pipeline::pipeline::{joint_angles, TickRunner, WorkStudyPipeline};
pub use pipeline::session::CameraSession;
pub use series::rolling_buffer::{AngleSample, RollingSeriesBuffer, SeriesSnapshot};
pub use utils::coordinate::Point2D;
