use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unrecognized timestamp format: {0}")]
    InvalidTimestamp(String),

    #[error("required tool not found on PATH: {0}")]
    MissingTool(String),

    #[error("download failed: {0}")]
    Download(String),

    #[error("frame extraction failed: {0}")]
    FrameExtraction(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;
