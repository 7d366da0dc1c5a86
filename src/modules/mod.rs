pub mod angle_sink;
pub mod camera_select;
pub mod frame_source;
pub mod pose_estimator;
pub mod pose_landmark;
#[cfg(feature = "camera")]
pub mod camera;
#[cfg(feature = "camera")]
pub mod overlay;
