use crate::detection::domain::face::BoundingBox;
use crate::shared::frame::Frame;

/// Descriptor payload carrying the detected face's own pixels.
///
/// Produced by detectors that crop at detection time, consumed by
/// compositors that paste pixels rather than run a swap model.
#[derive(Clone, Debug)]
pub struct FacePatch {
    pub pixels: Frame,
    /// Five landmarks (eyes, nose, mouth corners) in image coordinates, if the
    /// model provides them.
    pub landmarks: Option<[(f64, f64); 5]>,
}

/// Copies the pixels under `bbox`, clamped to frame bounds.
///
/// Returns `None` when the box does not overlap the frame.
pub fn crop_face(frame: &Frame, bbox: &BoundingBox) -> Option<Frame> {
    let rect = bbox.pixel_rect(frame.width(), frame.height())?;
    let channels = frame.channels() as usize;
    let x0 = rect.x as usize;
    let y0 = rect.y as usize;
    let w = rect.width as usize;
    let h = rect.height as usize;
    let stride = frame.width() as usize * channels;

    let src = frame.data();
    let mut data = Vec::with_capacity(w * h * channels);
    for row in y0..y0 + h {
        let start = row * stride + x0 * channels;
        data.extend_from_slice(&src[start..start + w * channels]);
    }

    Some(Frame::new(data, rect.width, rect.height, frame.channels()))
}
