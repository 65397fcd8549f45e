use crate::detection::domain::face::Face;
use crate::shared::frame::Frame;

/// Domain interface for face detection.
///
/// No ordering guarantee: callers impose their own order on the result.
/// Implementations may hold inference sessions that need `&mut self`.
pub trait FaceDetector: Send {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<Face>, Box<dyn std::error::Error>>;
}
