pub const YOLO_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const YOLO_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "tif", "webp"];

/// Directory generated swaps land in unless the caller picks another.
pub const DEFAULT_OUTPUT_DIR: &str = "images/generated";
pub const DEFAULT_OUTPUT_EXTENSION: &str = "png";

pub const MIN_ZOOM: f64 = 0.2;
pub const MAX_ZOOM: f64 = 4.0;
pub const ZOOM_IN_FACTOR: f64 = 1.25;
pub const ZOOM_OUT_FACTOR: f64 = 0.8;

/// Result canvas size used when no host surface reports one.
pub const DEFAULT_CANVAS_SIZE: (u32, u32) = (800, 500);
