pub mod patch_compositor;
