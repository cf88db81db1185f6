use std::fmt;

use posenet_base::TensorError;

#[derive(Debug)]
pub enum PoseError {
    Shape(String),
    InvalidOutputStride(u32),
    InvalidScaleFactor(f32),
    InvalidMultiplier(f32),
    InvalidConfig(String),
    InvalidSkeleton(String),
    Io(std::io::Error),
    Json(serde_json::Error),
    Network(String),
    Runtime(String),
}

impl fmt::Display for PoseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoseError::Shape(msg) => write!(f, "shape error: {msg}"),
            PoseError::InvalidOutputStride(stride) => {
                write!(f, "invalid output stride {stride}: must be one of 8, 16, 32")
            }
            PoseError::InvalidScaleFactor(factor) => {
                write!(f, "invalid image scale factor {factor}: must be in (0, 1]")
            }
            PoseError::InvalidMultiplier(multiplier) => write!(
                f,
                "invalid multiplier {multiplier}: no checkpoint exists, must be one of 0.5, 0.75, 1.0, 1.01"
            ),
            PoseError::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            PoseError::InvalidSkeleton(msg) => write!(f, "invalid skeleton: {msg}"),
            PoseError::Io(err) => write!(f, "io error: {err}"),
            PoseError::Json(err) => write!(f, "json error: {err}"),
            PoseError::Network(msg) => write!(f, "network error: {msg}"),
            PoseError::Runtime(msg) => write!(f, "runtime error: {msg}"),
        }
    }
}

impl std::error::Error for PoseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PoseError::Io(err) => Some(err),
            PoseError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PoseError {
    fn from(err: std::io::Error) -> Self {
        PoseError::Io(err)
    }
}

impl From<serde_json::Error> for PoseError {
    fn from(err: serde_json::Error) -> Self {
        PoseError::Json(err)
    }
}

impl From<TensorError> for PoseError {
    fn from(err: TensorError) -> Self {
        PoseError::Shape(err.to_string())
    }
}
