use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Screen capture failed: {0}")]
    CaptureFailure(String),

    #[error("Text recognition failed: {0}")]
    RecognitionFailure(String),

    #[error("Answer dispatch failed: {0}")]
    DispatchFailure(String),

    #[error("Malformed bank record: {0}")]
    MalformedRecord(String),

    #[error("Invalid answer label: {0:?}")]
    InvalidLabel(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
