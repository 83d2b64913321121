use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the detection adapter.
///
/// Missing weights get their own variant so callers can tell a fatal
/// deployment problem apart from a failure on one particular image.
#[derive(Error, Debug)]
pub enum DetectError {
    #[error("detector weights not found at {}", .path.display())]
    ModelNotFound { path: PathBuf },

    #[error("model error: {operation} failed")]
    Model {
        operation: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("image error: {operation} failed")]
    Image {
        operation: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("unexpected detector output shape {got:?}")]
    OutputShape { got: Vec<usize> },
}

pub type Result<T> = std::result::Result<T, DetectError>;

/// ONNX Runtime errors that occur without more specific context.
/// Callsites that know the operation construct `DetectError::Model` directly.
impl From<ort::Error> for DetectError {
    fn from(err: ort::Error) -> Self {
        Self::Model {
            operation: "onnx runtime call".to_string(),
            source: Box::new(err),
        }
    }
}

impl From<image::ImageError> for DetectError {
    fn from(err: image::ImageError) -> Self {
        Self::Image {
            operation: "image processing".to_string(),
            source: Box::new(err),
        }
    }
}

impl From<ndarray::ShapeError> for DetectError {
    fn from(err: ndarray::ShapeError) -> Self {
        Self::Model {
            operation: "tensor shape conversion".to_string(),
            source: Box::new(err),
        }
    }
}
