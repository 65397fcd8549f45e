use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Boxed adapter error that can cross to the thread waiting on a swap.
pub type SendError = Box<dyn std::error::Error + Send + Sync>;

/// Which of the two input images an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceRole {
    Target,
    Source,
}

impl fmt::Display for FaceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaceRole::Target => write!(f, "target"),
            FaceRole::Source => write!(f, "source"),
        }
    }
}

#[derive(Error, Debug)]
pub enum SwapError {
    #[error("no face detected in {which} image")]
    NoFaceDetected { which: FaceRole },
    #[error("failed to decode image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: SendError,
    },
    #[error("failed to write image {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: SendError,
    },
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("face detection failed on {which} image: {source}")]
    Detection {
        which: FaceRole,
        #[source]
        source: SendError,
    },
    #[error("compositing failed: {0}")]
    Composite(#[source] SendError),
    #[error("compositor changed image size from {expected:?} to {actual:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

/// Flattens a non-`Send` adapter error into one that can cross threads.
pub(crate) fn sendable(e: Box<dyn std::error::Error>) -> SendError {
    e.to_string().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_face_message_names_role() {
        let target = SwapError::NoFaceDetected {
            which: FaceRole::Target,
        };
        let source = SwapError::NoFaceDetected {
            which: FaceRole::Source,
        };
        assert_eq!(target.to_string(), "no face detected in target image");
        assert_eq!(source.to_string(), "no face detected in source image");
    }

    #[test]
    fn test_decode_message_includes_path() {
        let err = SwapError::Decode {
            path: PathBuf::from("images/a.png"),
            source: "bad header".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("images/a.png"));
        assert!(msg.contains("bad header"));
    }

    #[test]
    fn test_sendable_keeps_message() {
        let original: Box<dyn std::error::Error> = "model exploded".into();
        assert_eq!(sendable(original).to_string(), "model exploded");
    }

    #[test]
    fn test_swap_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SwapError>();
    }
}
