//! Linux multitouch slot-protocol decoding: turns the evdev MT event stream
//! into an ordered list of active contacts per SYN_REPORT frame.

use evdev::{AbsoluteAxisType, EventType, InputEvent};

pub const MAX_TOUCH_POINTS: usize = 10;

#[derive(Clone, Copy, Debug, Default)]
pub struct SlotState {
    pub active: bool,
    pub tracking_id: i32,
    pub position_x: i32,
    pub position_y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecoderState {
    Loading,
    FrameReady,
}

/// Slot-protocol state machine. Feed every event from the device; after a
/// SYN_REPORT the accumulated slot table reflects one complete frame.
#[derive(Debug)]
pub struct SlotDecoder {
    state: DecoderState,
    slot: usize,
    pub slots: [SlotState; MAX_TOUCH_POINTS],
}

impl Default for SlotDecoder {
    fn default() -> Self {
        Self {
            state: DecoderState::Loading,
            slot: 0,
            slots: [SlotState::default(); MAX_TOUCH_POINTS],
        }
    }
}

impl SlotDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process(&mut self, event: &InputEvent) {
        match event.event_type() {
            EventType::ABSOLUTE => {
                let code = AbsoluteAxisType(event.code());
                let value = event.value();

                match code {
                    AbsoluteAxisType::ABS_MT_SLOT => {
                        if value >= 0 && (value as usize) < MAX_TOUCH_POINTS {
                            self.slot = value as usize;
                        }
                    }
                    AbsoluteAxisType::ABS_MT_TRACKING_ID => {
                        if value < 0 {
                            self.slots[self.slot].active = false;
                        } else {
                            self.slots[self.slot].active = true;
                            self.slots[self.slot].tracking_id = value;
                        }
                    }
                    AbsoluteAxisType::ABS_MT_POSITION_X => {
                        self.slots[self.slot].position_x = value;
                    }
                    AbsoluteAxisType::ABS_MT_POSITION_Y => {
                        self.slots[self.slot].position_y = value;
                    }
                    _ => {}
                }
            }
            EventType::SYNCHRONIZATION => {
                self.state = DecoderState::FrameReady;
            }
            _ => {}
        }
    }

    pub fn is_frame_ready(&self) -> bool {
        self.state == DecoderState::FrameReady
    }

    pub fn take_frame_ready(&mut self) -> bool {
        let ready = self.is_frame_ready();
        self.state = DecoderState::Loading;
        ready
    }

    /// Active contacts in slot order: (tracking id, device x, device y).
    pub fn contacts(&self) -> Vec<(u64, i32, i32)> {
        self.slots
            .iter()
            .filter(|s| s.active)
            .map(|s| (s.tracking_id as u64, s.position_x, s.position_y))
            .collect()
    }
}

pub fn log_event(event: &InputEvent) {
    let type_name = match event.event_type() {
        EventType::KEY => "EV_KEY",
        EventType::ABSOLUTE => "EV_ABS",
        EventType::MISC => "EV_MSC",
        EventType::SYNCHRONIZATION => "EV_SYN",
        _ => "EV_???",
    };
    match code_lookup(event.code()) {
        Some(name) => log::debug!("  {}({}, {})", type_name, name, event.value()),
        None => log::debug!("  {}(0x{:X}, {})", type_name, event.code(), event.value()),
    }
}

fn code_lookup(code: u16) -> Option<&'static str> {
    match code {
        0x00 => Some("X"),
        0x01 => Some("Y"),
        0x2f => Some("SLOT"),
        0x35 => Some("POSITION_X"),
        0x36 => Some("POSITION_Y"),
        0x39 => Some("TRACKING_ID"),
        0x14a => Some("BTN_TOUCH"),
        _ => None,
    }
}
