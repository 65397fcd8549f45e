pub mod renderer;
pub mod viewport_controller;
pub mod viewport_transform;
