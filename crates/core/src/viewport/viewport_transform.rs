use std::ops::{Add, Mul, Sub};

/// A position or displacement in canvas pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Where a scaled image lands on the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub scale: f64,
}

impl Placement {
    /// Image-space coordinate of a canvas point.
    pub fn canvas_to_image(&self, p: Point) -> Point {
        Point::new((p.x - self.x) / self.scale, (p.y - self.y) / self.scale)
    }

    /// Canvas coordinate of an image-space point.
    pub fn image_to_canvas(&self, p: Point) -> Point {
        Point::new(self.x + p.x * self.scale, self.y + p.y * self.scale)
    }
}

/// Centers `base` scaled by `zoom` in `canvas`, then shifts it by `offset`.
///
/// Aspect ratio is always preserved. Pure: equal inputs give equal output.
pub fn place(base: (u32, u32), zoom: f64, offset: Point, canvas: (u32, u32)) -> Placement {
    let width = base.0 as f64 * zoom;
    let height = base.1 as f64 * zoom;
    Placement {
        x: (canvas.0 as f64 - width) / 2.0 + offset.x,
        y: (canvas.1 as f64 - height) / 2.0 + offset.y,
        width,
        height,
        scale: zoom,
    }
}

/// Largest size with `image`'s aspect ratio that fits inside `canvas`.
///
/// Scales up as well as down. Never returns a zero side for a non-empty image.
pub fn fit_size(image: (u32, u32), canvas: (u32, u32)) -> (u32, u32) {
    if image.0 == 0 || image.1 == 0 || canvas.0 == 0 || canvas.1 == 0 {
        return (0, 0);
    }
    let scale = (canvas.0 as f64 / image.0 as f64).min(canvas.1 as f64 / image.1 as f64);
    let width = ((image.0 as f64 * scale).round() as u32).clamp(1, canvas.0);
    let height = ((image.1 as f64 * scale).round() as u32).clamp(1, canvas.1);
    (width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_place_centers_unzoomed_image() {
        let p = place((200, 100), 1.0, Point::ORIGIN, (400, 300));
        assert_relative_eq!(p.x, 100.0);
        assert_relative_eq!(p.y, 100.0);
        assert_relative_eq!(p.width, 200.0);
        assert_relative_eq!(p.height, 100.0);
    }

    #[test]
    fn test_place_scales_both_axes_equally() {
        let p = place((300, 150), 1.5, Point::ORIGIN, (400, 400));
        assert_relative_eq!(p.width / p.height, 2.0);
        assert_relative_eq!(p.width, 450.0);
    }

    #[test]
    fn test_place_applies_offset_after_centering() {
        let centered = place((100, 100), 2.0, Point::ORIGIN, (400, 400));
        let shifted = place((100, 100), 2.0, Point::new(15.0, -7.5), (400, 400));
        assert_relative_eq!(shifted.x - centered.x, 15.0);
        assert_relative_eq!(shifted.y - centered.y, -7.5);
    }

    #[test]
    fn test_place_is_deterministic() {
        let a = place((640, 480), 1.25, Point::new(-3.0, 4.0), (800, 500));
        let b = place((640, 480), 1.25, Point::new(-3.0, 4.0), (800, 500));
        assert_eq!(a, b);
    }

    #[test]
    fn test_image_larger_than_canvas_has_negative_origin() {
        let p = place((400, 400), 1.25, Point::ORIGIN, (400, 400));
        assert_relative_eq!(p.x, -50.0);
        assert_relative_eq!(p.y, -50.0);
    }

    #[test]
    fn test_canvas_image_mapping_round_trips() {
        let p = place((320, 240), 1.7, Point::new(12.0, -30.0), (500, 500));
        let canvas = Point::new(123.0, 321.0);
        let back = p.image_to_canvas(p.canvas_to_image(canvas));
        assert_relative_eq!(back.x, canvas.x, epsilon = 1e-9);
        assert_relative_eq!(back.y, canvas.y, epsilon = 1e-9);
    }

    #[rstest]
    #[case::wide_into_wide((1000, 500), (800, 500), (800, 400))]
    #[case::tall_into_wide((500, 1000), (800, 500), (250, 500))]
    #[case::upscales((100, 50), (800, 500), (800, 400))]
    #[case::exact((800, 500), (800, 500), (800, 500))]
    fn test_fit_size(
        #[case] image: (u32, u32),
        #[case] canvas: (u32, u32),
        #[case] expected: (u32, u32),
    ) {
        assert_eq!(fit_size(image, canvas), expected);
    }

    #[test]
    fn test_fit_size_keeps_thin_images_visible() {
        assert_eq!(fit_size((10_000, 1), (100, 100)), (100, 1));
    }

    #[test]
    fn test_fit_size_empty_inputs() {
        assert_eq!(fit_size((0, 10), (100, 100)), (0, 0));
        assert_eq!(fit_size((10, 10), (0, 100)), (0, 0));
    }
}
