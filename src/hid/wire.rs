//! Binary frame encoding for the KVM control channel. Every logical input
//! event maps to a fixed-size frame: a one-byte opcode followed by an
//! opcode-specific payload. Multi-byte integers are big-endian. Name fields
//! are ASCII, zero-padded, truncated at the field width.

use super::{HidEvent, MouseButton};

pub const OP_KEY: u8 = 0x01;
pub const OP_BUTTON: u8 = 0x02;
pub const OP_MOVE_ABS: u8 = 0x03;
pub const OP_MOVE_REL: u8 = 0x04;
pub const OP_WHEEL: u8 = 0x05;

pub const KEY_NAME_LEN: usize = 30;
pub const BUTTON_NAME_LEN: usize = 6;

pub const KEY_FRAME_LEN: usize = 2 + KEY_NAME_LEN;
pub const BUTTON_FRAME_LEN: usize = 2 + BUTTON_NAME_LEN;
pub const MOVE_ABS_FRAME_LEN: usize = 5;
pub const MOVE_REL_FRAME_LEN: usize = 3;
pub const WHEEL_FRAME_LEN: usize = 3;

/// Key down/up: opcode, state byte, zero-padded key name.
pub fn encode_key(name: &str, pressed: bool) -> [u8; KEY_FRAME_LEN] {
    let mut frame = [0u8; KEY_FRAME_LEN];
    frame[0] = OP_KEY;
    frame[1] = pressed as u8;
    write_name(&mut frame[2..], name);
    frame
}

/// Mouse button down/up: opcode, state byte, zero-padded button name.
pub fn encode_button(button: MouseButton, pressed: bool) -> [u8; BUTTON_FRAME_LEN] {
    let mut frame = [0u8; BUTTON_FRAME_LEN];
    frame[0] = OP_BUTTON;
    frame[1] = pressed as u8;
    write_name(&mut frame[2..], button.wire_name());
    frame
}

/// Absolute move: opcode, signed 16-bit x and y spanning the full remote
/// screen on each axis.
pub fn encode_move_abs(x: i16, y: i16) -> [u8; MOVE_ABS_FRAME_LEN] {
    let mut frame = [0u8; MOVE_ABS_FRAME_LEN];
    frame[0] = OP_MOVE_ABS;
    frame[1..3].copy_from_slice(&x.to_be_bytes());
    frame[3..5].copy_from_slice(&y.to_be_bytes());
    frame
}

/// Relative move: opcode, signed 8-bit deltas.
pub fn encode_move_rel(dx: i8, dy: i8) -> [u8; MOVE_REL_FRAME_LEN] {
    [OP_MOVE_REL, dx as u8, dy as u8]
}

/// Wheel: opcode, signed 8-bit deltas.
pub fn encode_wheel(dx: i8, dy: i8) -> [u8; WHEEL_FRAME_LEN] {
    [OP_WHEEL, dx as u8, dy as u8]
}

/// Encode any logical event into its wire frame.
pub fn encode(event: &HidEvent) -> Vec<u8> {
    match *event {
        HidEvent::Key { name, pressed } => encode_key(name, pressed).to_vec(),
        HidEvent::Button { button, pressed } => encode_button(button, pressed).to_vec(),
        HidEvent::MoveAbs { x, y } => encode_move_abs(x, y).to_vec(),
        HidEvent::MoveRel { dx, dy } => encode_move_rel(dx, dy).to_vec(),
        HidEvent::Wheel { dx, dy } => encode_wheel(dx, dy).to_vec(),
    }
}

fn write_name(field: &mut [u8], name: &str) {
    let bytes = name.as_bytes();
    let len = bytes.len().min(field.len());
    field[..len].copy_from_slice(&bytes[..len]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_frame_layout() {
        let frame = encode_key("Enter", true);
        assert_eq!(frame.len(), KEY_FRAME_LEN);
        assert_eq!(frame[0], OP_KEY);
        assert_eq!(frame[1], 1);
        assert_eq!(&frame[2..7], b"Enter");
        assert!(frame[7..].iter().all(|&b| b == 0));
    }

    #[test]
    fn overlong_key_name_is_truncated() {
        let name = "X".repeat(KEY_NAME_LEN + 10);
        let frame = encode_key(&name, false);
        assert_eq!(frame.len(), KEY_FRAME_LEN);
        assert_eq!(frame[1], 0);
        assert!(frame[2..].iter().all(|&b| b == b'X'));
    }

    #[test]
    fn button_frame_layout() {
        let frame = encode_button(MouseButton::Middle, true);
        assert_eq!(frame.len(), BUTTON_FRAME_LEN);
        assert_eq!(frame[0], OP_BUTTON);
        assert_eq!(&frame[2..8], b"middle");
    }

    #[test]
    fn move_abs_is_big_endian() {
        let frame = encode_move_abs(-32768, 32767);
        assert_eq!(frame, [OP_MOVE_ABS, 0x80, 0x00, 0x7F, 0xFF]);
    }

    #[test]
    fn rel_and_wheel_frames() {
        assert_eq!(encode_move_rel(-1, 127), [OP_MOVE_REL, 0xFF, 0x7F]);
        assert_eq!(encode_wheel(0, -5), [OP_WHEEL, 0x00, 0xFB]);
    }

    #[test]
    fn encode_matches_direct_encoders() {
        let ev = HidEvent::MoveAbs { x: 10, y: -10 };
        assert_eq!(encode(&ev), encode_move_abs(10, -10).to_vec());
    }
}
