use std::fmt;

/// Index used for the placeholder entry when no device opens
pub const NO_CAMERA_INDEX: i32 = -1;

/// Entry of the camera selection list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraChoice {
    pub label: String,
    pub index: i32,
}

impl CameraChoice {
    pub fn is_available(&self) -> bool {
        self.index >= 0
    }
}

/// list_cameras probes device indices `0..max_index` and lists the ones that open.
///
/// When nothing opens the list holds a single "No camera found" entry so the
/// selector is never empty.
///
/// # Arguments
/// * `max_index` - number of device indices to probe
/// * `probe` - returns true when the device at the given index can be opened
///
/// # Returns
/// * `Vec<CameraChoice>`
pub fn list_cameras<P>(max_index: i32, mut probe: P) -> Vec<CameraChoice>
where
    P: FnMut(i32) -> bool,
{
    let mut choices: Vec<CameraChoice> = (0..max_index)
        .filter(|index| probe(*index))
        .map(|index| CameraChoice {
            label: format!("Camera {index}"),
            index,
        })
        .collect();

    if choices.is_empty() {
        choices.push(CameraChoice {
            label: "No camera found".to_string(),
            index: NO_CAMERA_INDEX,
        });
    }
    choices
}

/// Status of the capture session as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveCamera {
    None,
    Failed,
    Running(i32),
}

impl fmt::Display for ActiveCamera {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActiveCamera::None => write!(f, "Active Camera: None"),
            ActiveCamera::Failed => write!(f, "Active Camera: Failed"),
            ActiveCamera::Running(index) => write!(f, "Active Camera: {index}"),
        }
    }
}
