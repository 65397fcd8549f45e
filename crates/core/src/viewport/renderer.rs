use crate::shared::frame::Frame;
use crate::viewport::viewport_controller::ViewportState;

/// Turns a viewport state into the canvas-sized pixels a host displays.
pub trait Renderer {
    fn render(&self, state: &ViewportState) -> Frame;
}

pub const WHITE: [u8; 3] = [255, 255, 255];

/// CPU renderer: fills the canvas, then blits the zoomed base image with
/// nearest-neighbour sampling, clipped to the canvas.
///
/// Placement is snapped to whole pixels: the origin is floored and the
/// drawn size truncated.
pub struct CanvasRenderer {
    background: [u8; 3],
}

impl CanvasRenderer {
    pub fn new(background: [u8; 3]) -> Self {
        Self { background }
    }
}

impl Default for CanvasRenderer {
    fn default() -> Self {
        Self::new(WHITE)
    }
}

impl Renderer for CanvasRenderer {
    fn render(&self, state: &ViewportState) -> Frame {
        let (cw, ch) = state.canvas_size;
        let mut canvas = Frame::filled(cw, ch, self.background);

        let (Some(image), Some(placement)) = (state.base_image.as_ref(), state.placement()) else {
            return canvas;
        };
        if image.channels() != 3 || image.is_empty() {
            log::warn!(
                "Cannot render a {}-channel {}x{} image",
                image.channels(),
                image.width(),
                image.height()
            );
            return canvas;
        }

        let draw_w = placement.width as i64;
        let draw_h = placement.height as i64;
        if draw_w <= 0 || draw_h <= 0 {
            return canvas;
        }
        let draw_x = placement.x.floor() as i64;
        let draw_y = placement.y.floor() as i64;

        let x_start = draw_x.max(0);
        let x_end = (draw_x + draw_w).min(cw as i64);
        let y_start = draw_y.max(0);
        let y_end = (draw_y + draw_h).min(ch as i64);
        if x_start >= x_end || y_start >= y_end {
            return canvas;
        }

        let (iw, ih) = (image.width() as i64, image.height() as i64);
        let src = image.data();
        let dst = canvas.data_mut();
        let canvas_stride = cw as usize * 3;
        let image_stride = iw as usize * 3;

        for y in y_start..y_end {
            let sy = (((y - draw_y) * ih) / draw_h).min(ih - 1) as usize;
            let dst_row = y as usize * canvas_stride;
            let src_row = sy * image_stride;
            for x in x_start..x_end {
                let sx = (((x - draw_x) * iw) / draw_w).min(iw - 1) as usize;
                let d = dst_row + x as usize * 3;
                let s = src_row + sx * 3;
                dst[d..d + 3].copy_from_slice(&src[s..s + 3]);
            }
        }
        canvas
    }
}
