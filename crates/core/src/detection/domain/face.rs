use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Axis-aligned face rectangle in image pixels, `(x0, y0)` top-left and
/// `(x1, y1)` bottom-right.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

/// Integer pixel rectangle fully inside an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f64 {
        (self.x1 - self.x0).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.y1 - self.y0).max(0.0)
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    pub fn iou(&self, other: &BoundingBox) -> f64 {
        let ix0 = self.x0.max(other.x0);
        let iy0 = self.y0.max(other.y0);
        let ix1 = self.x1.min(other.x1);
        let iy1 = self.y1.min(other.y1);

        let inter = (ix1 - ix0).max(0.0) * (iy1 - iy0).max(0.0);
        if inter == 0.0 {
            return 0.0;
        }
        inter / (self.area() + other.area() - inter)
    }

    /// The covered pixels after clamping to a `width` x `height` image.
    ///
    /// Returns `None` when nothing of the box lies inside the image.
    pub fn pixel_rect(&self, width: u32, height: u32) -> Option<PixelRect> {
        let x0 = self.x0.floor().clamp(0.0, width as f64) as u32;
        let y0 = self.y0.floor().clamp(0.0, height as f64) as u32;
        let x1 = self.x1.ceil().clamp(0.0, width as f64) as u32;
        let y1 = self.y1.ceil().clamp(0.0, height as f64) as u32;
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(PixelRect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }
}

/// Opaque detector output handed back to the compositor untouched.
///
/// The pipeline never inspects it; each compositor downcasts to the payload
/// type its paired detector produces.
#[derive(Clone)]
pub struct FaceDescriptor(Arc<dyn Any + Send + Sync>);

impl FaceDescriptor {
    pub fn new<T: Any + Send + Sync>(payload: T) -> Self {
        Self(Arc::new(payload))
    }

    /// A descriptor carrying no payload.
    pub fn empty() -> Self {
        Self::new(())
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for FaceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FaceDescriptor(..)")
    }
}

/// A detected face: where it is, plus whatever the detector needs to pass on.
#[derive(Clone, Debug)]
pub struct Face {
    pub bbox: BoundingBox,
    pub descriptor: FaceDescriptor,
}

impl Face {
    pub fn new(bbox: BoundingBox, descriptor: FaceDescriptor) -> Self {
        Self { bbox, descriptor }
    }
}
