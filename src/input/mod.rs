#[cfg(target_os = "linux")]
pub mod evdev_backend;

use std::path::Path;

/// One touch contact. The gesture engine depends only on the contact count
/// and coordinates, never on where the events came from. Backends report
/// positions normalized to 0..1 of the device surface; the app maps them
/// onto the video surface rectangle before they reach the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub id: u64,
    pub pos: egui::Pos2,
}

impl Contact {
    pub fn new(id: u64, x: f32, y: f32) -> Self {
        Self {
            id,
            pos: egui::pos2(x, y),
        }
    }
}

/// Ordered snapshot of all active contacts after one hardware report.
#[derive(Debug, Clone, Default)]
pub struct TouchFrame {
    pub contacts: Vec<Contact>,
}

#[derive(Debug)]
pub enum InputError {
    OpenFailed(String),
    GrabFailed(String),
    ReadError(String),
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::OpenFailed(msg) => write!(f, "open failed: {}", msg),
            InputError::GrabFailed(msg) => write!(f, "grab failed: {}", msg),
            InputError::ReadError(msg) => write!(f, "read error: {}", msg),
        }
    }
}

impl std::error::Error for InputError {}

#[allow(dead_code)]
pub trait InputBackend: Send + 'static {
    fn open(device_path: &Path) -> Result<Self, InputError>
    where
        Self: Sized;
    fn grab(&mut self) -> Result<(), InputError>;
    fn ungrab(&mut self) -> Result<(), InputError>;
    fn poll_events(&mut self) -> Result<Option<TouchFrame>, InputError>;
}
