use crate::detection::domain::face::{Face, PixelRect};
use crate::detection::domain::face_patch::FacePatch;
use crate::shared::frame::Frame;
use crate::swapping::domain::face_compositor::FaceCompositor;

/// Fraction of the ellipse radius over which the pasted face fades out.
pub const DEFAULT_FEATHER: f64 = 0.25;

/// CPU paste-back compositor.
///
/// Resizes the source face's [`FacePatch`] to the target box and blends it
/// into the frame through an elliptical mask whose rim is feathered, so the
/// seam fades into the surrounding pixels.
pub struct PatchCompositor {
    feather: f64,
}

impl PatchCompositor {
    pub fn new(feather: f64) -> Self {
        Self {
            feather: feather.clamp(0.0, 1.0),
        }
    }
}

impl Default for PatchCompositor {
    fn default() -> Self {
        Self::new(DEFAULT_FEATHER)
    }
}

impl FaceCompositor for PatchCompositor {
    fn composite(
        &self,
        frame: &mut Frame,
        target: &Face,
        source: &Face,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if frame.channels() != 3 {
            return Err(format!("expected an RGB frame, got {} channels", frame.channels()).into());
        }
        let patch = source
            .descriptor
            .downcast_ref::<FacePatch>()
            .ok_or("source face carries no pixel patch")?;

        let Some(rect) = target.bbox.pixel_rect(frame.width(), frame.height()) else {
            log::debug!("Target face {:?} lies outside the image", target.bbox);
            return Ok(());
        };

        let resized = resize_patch(&patch.pixels, rect.width, rect.height)?;
        let frame_width = frame.width() as usize;
        blend_ellipse(frame.data_mut(), frame_width, &resized, rect, self.feather);
        Ok(())
    }
}

fn resize_patch(
    patch: &Frame,
    width: u32,
    height: u32,
) -> Result<image::RgbImage, Box<dyn std::error::Error>> {
    let img = image::RgbImage::from_raw(patch.width(), patch.height(), patch.data().to_vec())
        .ok_or("face patch is not an RGB image")?;
    Ok(image::imageops::resize(
        &img,
        width,
        height,
        image::imageops::FilterType::Triangle,
    ))
}

/// Mask weight at normalized elliptical distance `d` (0 at center, 1 on the rim).
fn mask_weight(d: f64, feather: f64) -> f64 {
    if d >= 1.0 {
        0.0
    } else if feather <= 0.0 || d <= 1.0 - feather {
        1.0
    } else {
        (1.0 - d) / feather
    }
}

fn blend_ellipse(
    data: &mut [u8],
    frame_width: usize,
    patch: &image::RgbImage,
    rect: PixelRect,
    feather: f64,
) {
    let semi_a = rect.width as f64 / 2.0;
    let semi_b = rect.height as f64 / 2.0;

    for row in 0..rect.height {
        for col in 0..rect.width {
            // Sample at pixel centers.
            let dx = (col as f64 + 0.5 - semi_a) / semi_a;
            let dy = (row as f64 + 0.5 - semi_b) / semi_b;
            let alpha = mask_weight((dx * dx + dy * dy).sqrt(), feather);
            if alpha <= 0.0 {
                continue;
            }

            let offset = ((rect.y + row) as usize * frame_width + (rect.x + col) as usize) * 3;
            let src = patch.get_pixel(col, row).0;
            for (c, &s) in src.iter().enumerate() {
                let dst = data[offset + c] as f64;
                data[offset + c] = (s as f64 * alpha + dst * (1.0 - alpha)).round() as u8;
            }
        }
    }
}
