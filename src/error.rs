use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkStudyError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("camera error: {0}")]
    Camera(String),

    #[error("logging error: {0}")]
    Logging(String),

    #[error(transparent)]
    Collaborator(#[from] anyhow::Error),
}

pub type WorkStudyResult<T> = Result<T, WorkStudyError>;
