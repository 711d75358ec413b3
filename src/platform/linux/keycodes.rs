//! Linux evdev keycodes for keybind injection.
//!
//! Codes are from `linux/input-event-codes.h`. The RemoteDesktop portal
//! takes them as-is; X11 keycodes are the evdev code plus 8.

use crate::platform::KeyCode;

/// Offset between evdev codes and X11 keycodes under the evdev XKB rules.
pub const X11_KEYCODE_OFFSET: u32 = 8;

/// Converts a canonical `KeyCode` to a Linux evdev keycode.
pub fn keycode_to_evdev(key: KeyCode) -> u32 {
    match key {
        KeyCode::Q => 16,
        KeyCode::W => 17,
        KeyCode::E => 18,
        KeyCode::R => 19,
        KeyCode::T => 20,
        KeyCode::Y => 21,
        KeyCode::U => 22,
        KeyCode::I => 23,
        KeyCode::O => 24,
        KeyCode::P => 25,
        KeyCode::A => 30,
        KeyCode::S => 31,
        KeyCode::D => 32,
        KeyCode::F => 33,
        KeyCode::G => 34,
        KeyCode::H => 35,
        KeyCode::J => 36,
        KeyCode::K => 37,
        KeyCode::L => 38,
        KeyCode::Z => 44,
        KeyCode::X => 45,
        KeyCode::C => 46,
        KeyCode::V => 47,
        KeyCode::B => 48,
        KeyCode::N => 49,
        KeyCode::M => 50,

        // KEY_1 = 2 .. KEY_9 = 10, KEY_0 = 11
        KeyCode::Key1 => 2,
        KeyCode::Key2 => 3,
        KeyCode::Key3 => 4,
        KeyCode::Key4 => 5,
        KeyCode::Key5 => 6,
        KeyCode::Key6 => 7,
        KeyCode::Key7 => 8,
        KeyCode::Key8 => 9,
        KeyCode::Key9 => 10,
        KeyCode::Key0 => 11,

        // KEY_F1 = 59 .. KEY_F10 = 68; F11/F12 are out of sequence.
        KeyCode::F1 => 59,
        KeyCode::F2 => 60,
        KeyCode::F3 => 61,
        KeyCode::F4 => 62,
        KeyCode::F5 => 63,
        KeyCode::F6 => 64,
        KeyCode::F7 => 65,
        KeyCode::F8 => 66,
        KeyCode::F9 => 67,
        KeyCode::F10 => 68,
        KeyCode::F11 => 87,
        KeyCode::F12 => 88,
        // KEY_F13 = 183 .. KEY_F24 = 194
        KeyCode::F13 => 183,
        KeyCode::F14 => 184,
        KeyCode::F15 => 185,
        KeyCode::F16 => 186,
        KeyCode::F17 => 187,
        KeyCode::F18 => 188,
        KeyCode::F19 => 189,
        KeyCode::F20 => 190,
        KeyCode::F21 => 191,
        KeyCode::F22 => 192,
        KeyCode::F23 => 193,
        KeyCode::F24 => 194,

        KeyCode::LeftCtrl => 29,
        KeyCode::LeftShift => 42,
        KeyCode::RightShift => 54,
        KeyCode::LeftAlt => 56,
        KeyCode::RightCtrl => 97,
        KeyCode::RightAlt => 100,
        KeyCode::LeftMeta => 125,
        KeyCode::RightMeta => 126,

        KeyCode::Escape => 1,
        KeyCode::Backspace => 14,
        KeyCode::Tab => 15,
        KeyCode::Enter => 28,
        KeyCode::Space => 57,
        KeyCode::Home => 102,
        KeyCode::Up => 103,
        KeyCode::PageUp => 104,
        KeyCode::Left => 105,
        KeyCode::Right => 106,
        KeyCode::End => 107,
        KeyCode::Down => 108,
        KeyCode::PageDown => 109,
        KeyCode::Insert => 110,
        KeyCode::Delete => 111,

        KeyCode::PrintScreen => 99, // KEY_SYSRQ
        KeyCode::ScrollLock => 70,
        KeyCode::Pause => 119,
    }
}

/// X11 keycode for `key`, as XTest expects it.
pub fn keycode_to_x11(key: KeyCode) -> u8 {
    // All evdev codes above are < 248, so the sum fits a u8.
    (keycode_to_evdev(key) + X11_KEYCODE_OFFSET) as u8
}
