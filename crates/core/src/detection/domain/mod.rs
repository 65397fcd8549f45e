pub mod face;
pub mod face_detector;
pub mod face_patch;
