use crate::detection::domain::face::Face;
use crate::shared::frame::Frame;

/// Domain interface for blending a source face into one target face location.
///
/// Implementations modify the frame in-place and must leave its dimensions
/// unchanged. Each call sees the output of the previous one.
pub trait FaceCompositor: Send {
    fn composite(
        &self,
        frame: &mut Frame,
        target: &Face,
        source: &Face,
    ) -> Result<(), Box<dyn std::error::Error>>;
}
