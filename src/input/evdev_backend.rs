use super::{Contact, InputBackend, InputError, TouchFrame};
use crate::multitouch::{self, SlotDecoder};
use evdev::{AbsoluteAxisType, Device};
use std::path::Path;

/// Reads a touchscreen directly via evdev (kiosk deployments). Device
/// coordinates are normalized to 0..1 using the advertised absolute-axis
/// ranges; the app maps them onto the video surface.
pub struct EvdevBackend {
    device: Device,
    decoder: SlotDecoder,
    range_x: (f32, f32),
    range_y: (f32, f32),
}

impl EvdevBackend {
    fn axis_range(device: &Device, axis: AbsoluteAxisType) -> Option<(f32, f32)> {
        let state = device.get_abs_state().ok()?;
        let info = state.get(axis.0 as usize)?;
        if info.maximum > info.minimum {
            Some((info.minimum as f32, info.maximum as f32))
        } else {
            None
        }
    }
}

impl InputBackend for EvdevBackend {
    fn open(device_path: &Path) -> Result<Self, InputError> {
        let device = Device::open(device_path)
            .map_err(|e| InputError::OpenFailed(format!("{}: {}", device_path.display(), e)))?;

        let range_x = Self::axis_range(&device, AbsoluteAxisType::ABS_MT_POSITION_X)
            .ok_or_else(|| {
                InputError::OpenFailed(format!(
                    "{}: no ABS_MT_POSITION_X axis (not a touchscreen?)",
                    device_path.display()
                ))
            })?;
        let range_y = Self::axis_range(&device, AbsoluteAxisType::ABS_MT_POSITION_Y)
            .ok_or_else(|| {
                InputError::OpenFailed(format!(
                    "{}: no ABS_MT_POSITION_Y axis (not a touchscreen?)",
                    device_path.display()
                ))
            })?;

        Ok(Self {
            device,
            decoder: SlotDecoder::new(),
            range_x,
            range_y,
        })
    }

    fn grab(&mut self) -> Result<(), InputError> {
        self.device
            .grab()
            .map_err(|e| InputError::GrabFailed(e.to_string()))
    }

    fn ungrab(&mut self) -> Result<(), InputError> {
        self.device
            .ungrab()
            .map_err(|e| InputError::GrabFailed(e.to_string()))
    }

    fn poll_events(&mut self) -> Result<Option<TouchFrame>, InputError> {
        match self.device.fetch_events() {
            Ok(events) => {
                for event in events {
                    multitouch::log_event(&event);
                    self.decoder.process(&event);
                }
                if !self.decoder.take_frame_ready() {
                    return Ok(None);
                }
                let (x0, x1) = self.range_x;
                let (y0, y1) = self.range_y;
                let contacts = self
                    .decoder
                    .contacts()
                    .into_iter()
                    .map(|(id, x, y)| {
                        Contact::new(
                            id,
                            ((x as f32 - x0) / (x1 - x0)).clamp(0.0, 1.0),
                            ((y as f32 - y0) / (y1 - y0)).clamp(0.0, 1.0),
                        )
                    })
                    .collect();
                Ok(Some(TouchFrame { contacts }))
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(InputError::ReadError(e.to_string())),
        }
    }
}
