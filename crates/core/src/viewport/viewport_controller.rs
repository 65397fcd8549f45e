use crate::shared::constants::{MAX_ZOOM, MIN_ZOOM, ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR};
use crate::shared::frame::Frame;
use crate::viewport::viewport_transform::{place, Placement, Point};

/// Inclusive zoom bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportLimits {
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl ViewportLimits {
    pub fn new(min_zoom: f64, max_zoom: f64) -> Self {
        Self {
            min_zoom: min_zoom.min(max_zoom),
            max_zoom: max_zoom.max(min_zoom),
        }
    }

    pub fn clamp(&self, zoom: f64) -> f64 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}

impl Default for ViewportLimits {
    fn default() -> Self {
        Self::new(MIN_ZOOM, MAX_ZOOM)
    }
}

/// Everything needed to draw the canvas.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewportState {
    pub zoom: f64,
    pub offset: Point,
    pub base_image: Option<Frame>,
    pub canvas_size: (u32, u32),
}

impl ViewportState {
    pub fn new(canvas_size: (u32, u32)) -> Self {
        Self {
            zoom: 1.0,
            offset: Point::ORIGIN,
            base_image: None,
            canvas_size,
        }
    }

    /// Where the base image is drawn, or `None` when nothing is shown.
    pub fn placement(&self) -> Option<Placement> {
        self.base_image
            .as_ref()
            .map(|img| place(img.dimensions(), self.zoom, self.offset, self.canvas_size))
    }

    fn canvas_center(&self) -> Point {
        Point::new(
            self.canvas_size.0 as f64 / 2.0,
            self.canvas_size.1 as f64 / 2.0,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DragState {
    Idle,
    Dragging { last: Point },
}

/// What the host should do after an input event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewportResponse {
    /// Not handled here; the host applies its default behaviour.
    Ignored,
    /// Handled, nothing visible changed.
    Unchanged,
    /// Handled, the canvas must be re-rendered.
    Redraw,
}

/// Sole owner and mutator of a [`ViewportState`].
///
/// Turns wheel, drag and resize events into zoom/offset updates. Zoom keeps
/// the image point under the cursor fixed on screen; pan is only possible
/// while zoomed in past 1.0.
pub struct ViewportController {
    state: ViewportState,
    limits: ViewportLimits,
    drag: DragState,
}

impl ViewportController {
    pub fn new(canvas_size: (u32, u32), limits: ViewportLimits) -> Self {
        Self {
            state: ViewportState::new(canvas_size),
            limits,
            drag: DragState::Idle,
        }
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn zoom(&self) -> f64 {
        self.state.zoom
    }

    pub fn offset(&self) -> Point {
        self.state.offset
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn limits(&self) -> ViewportLimits {
        self.limits
    }

    pub fn placement(&self) -> Option<Placement> {
        self.state.placement()
    }

    /// Wheel event. Without the zoom modifier the event is left to the host.
    ///
    /// A positive `wheel_delta` zooms in by 1.25, anything else zooms out by
    /// 0.8. The result is clamped to the limits; a step that cannot move
    /// past a bound leaves the state untouched.
    pub fn on_zoom(
        &mut self,
        cursor: Point,
        wheel_delta: f64,
        modifier_active: bool,
    ) -> ViewportResponse {
        if !modifier_active {
            return ViewportResponse::Ignored;
        }

        let factor = if wheel_delta > 0.0 {
            ZOOM_IN_FACTOR
        } else {
            ZOOM_OUT_FACTOR
        };
        let new_zoom = self.limits.clamp(self.state.zoom * factor);
        if new_zoom == self.state.zoom {
            return ViewportResponse::Unchanged;
        }

        if self.state.base_image.is_some() {
            let rel = cursor - self.state.canvas_center() - self.state.offset;
            let scale_factor = new_zoom / self.state.zoom;
            self.state.offset = self.state.offset - rel * (scale_factor - 1.0);
        }
        self.state.zoom = new_zoom;
        log::debug!(
            "Zoom {:.3} offset ({:.1}, {:.1})",
            self.state.zoom,
            self.state.offset.x,
            self.state.offset.y
        );
        ViewportResponse::Redraw
    }

    /// Pointer down. Starts a drag only when zoomed in past 1.0.
    pub fn on_pan_start(&mut self, pointer: Point) -> ViewportResponse {
        if self.state.zoom > 1.0 {
            self.drag = DragState::Dragging { last: pointer };
            ViewportResponse::Unchanged
        } else {
            ViewportResponse::Ignored
        }
    }

    /// Pointer move. While dragging, shifts the offset by the pointer delta 1:1.
    pub fn on_pan_move(&mut self, pointer: Point) -> ViewportResponse {
        match self.drag {
            DragState::Dragging { last } => {
                self.state.offset = self.state.offset + (pointer - last);
                self.drag = DragState::Dragging { last: pointer };
                ViewportResponse::Redraw
            }
            DragState::Idle => ViewportResponse::Ignored,
        }
    }

    /// Pointer up.
    pub fn on_pan_end(&mut self) -> ViewportResponse {
        match self.drag {
            DragState::Dragging { .. } => {
                self.drag = DragState::Idle;
                ViewportResponse::Unchanged
            }
            DragState::Idle => ViewportResponse::Ignored,
        }
    }

    /// Keeps zoom and offset; the image is re-placed against the new canvas.
    pub fn on_resize(&mut self, canvas_size: (u32, u32)) -> ViewportResponse {
        self.state.canvas_size = canvas_size;
        ViewportResponse::Redraw
    }

    pub fn reset(&mut self) -> ViewportResponse {
        self.state.zoom = 1.0;
        self.state.offset = Point::ORIGIN;
        ViewportResponse::Redraw
    }

    /// Replaces the base image and resets zoom and offset.
    pub fn show_image(&mut self, image: Frame) -> ViewportResponse {
        self.state.base_image = Some(image);
        self.drag = DragState::Idle;
        self.reset()
    }

    pub fn clear_image(&mut self) -> ViewportResponse {
        self.state.base_image = None;
        self.drag = DragState::Idle;
        self.reset()
    }
}
