pub mod app;
pub mod discovery;
pub mod geometry;
pub mod gesture;
pub mod hid;
pub mod input;
pub mod keymap;
#[cfg(target_os = "linux")]
pub mod multitouch;
pub mod render;
pub mod viewport;
