//! Detection errors.

use crate::transform::TransformError;
use thiserror::Error;

/// Broad class of a detection failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The frame could not be used.
    Input,
    /// The inference engine reported a non-OK status.
    Inference,
}

/// Errors returned by [`crate::Detector::detect_objects`].
///
/// All of them are recoverable; the detector can be used again on the
/// next frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DetectError {
    #[error("Cannot run detection on empty image")]
    EmptyFrame,
    #[error("Cannot resample frame: {0}")]
    Resample(#[from] TransformError),
    #[error("Failed to run classifier with error code {code}")]
    Inference { code: i32 },
}

impl DetectError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DetectError::EmptyFrame | DetectError::Resample(_) => ErrorKind::Input,
            DetectError::Inference { .. } => ErrorKind::Inference,
        }
    }

    /// Engine status code for inference failures.
    pub fn code(&self) -> Option<i32> {
        match self {
            DetectError::Inference { code } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            DetectError::EmptyFrame.to_string(),
            "Cannot run detection on empty image"
        );
        assert_eq!(
            DetectError::Inference { code: -5 }.to_string(),
            "Failed to run classifier with error code -5"
        );
    }

    #[test]
    fn test_kinds() {
        assert_eq!(DetectError::EmptyFrame.kind(), ErrorKind::Input);
        assert_eq!(
            DetectError::from(TransformError::EmptySource).kind(),
            ErrorKind::Input
        );
        assert_eq!(DetectError::Inference { code: 1 }.kind(), ErrorKind::Inference);
        assert_eq!(DetectError::Inference { code: 1 }.code(), Some(1));
        assert_eq!(DetectError::EmptyFrame.code(), None);
    }
}
