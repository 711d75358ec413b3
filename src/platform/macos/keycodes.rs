//! macOS virtual key codes (CGKeyCode, u16) for keybind injection.
//!
//! Key codes are physical key positions per Apple HIToolbox/Events.h and
//! assume an ANSI layout. Mac keyboards have no PrintScreen, ScrollLock or
//! Pause; those emit F13, F14 and F15, which sit at the same position on
//! extended keyboards.

use crate::platform::KeyCode;

/// Converts a canonical `KeyCode` to a macOS CGKeyCode.
///
/// Returns `None` for F21-F24, which have no key code on macOS.
pub fn keycode_to_vkcode(key: KeyCode) -> Option<u16> {
    let vk = match key {
        KeyCode::A => 0x00,
        KeyCode::S => 0x01,
        KeyCode::D => 0x02,
        KeyCode::F => 0x03,
        KeyCode::H => 0x04,
        KeyCode::G => 0x05,
        KeyCode::Z => 0x06,
        KeyCode::X => 0x07,
        KeyCode::C => 0x08,
        KeyCode::V => 0x09,
        KeyCode::B => 0x0B,
        KeyCode::Q => 0x0C,
        KeyCode::W => 0x0D,
        KeyCode::E => 0x0E,
        KeyCode::R => 0x0F,
        KeyCode::Y => 0x10,
        KeyCode::T => 0x11,
        KeyCode::O => 0x1F,
        KeyCode::U => 0x20,
        KeyCode::I => 0x22,
        KeyCode::P => 0x23,
        KeyCode::L => 0x25,
        KeyCode::J => 0x26,
        KeyCode::K => 0x28,
        KeyCode::N => 0x2D,
        KeyCode::M => 0x2E,

        KeyCode::Key1 => 0x12,
        KeyCode::Key2 => 0x13,
        KeyCode::Key3 => 0x14,
        KeyCode::Key4 => 0x15,
        KeyCode::Key6 => 0x16,
        KeyCode::Key5 => 0x17,
        KeyCode::Key9 => 0x19,
        KeyCode::Key7 => 0x1A,
        KeyCode::Key8 => 0x1C,
        KeyCode::Key0 => 0x1D,

        KeyCode::F1 => 0x7A,
        KeyCode::F2 => 0x78,
        KeyCode::F3 => 0x63,
        KeyCode::F4 => 0x76,
        KeyCode::F5 => 0x60,
        KeyCode::F6 => 0x61,
        KeyCode::F7 => 0x62,
        KeyCode::F8 => 0x64,
        KeyCode::F9 => 0x65,
        KeyCode::F10 => 0x6D,
        KeyCode::F11 => 0x67,
        KeyCode::F12 => 0x6F,
        KeyCode::F13 | KeyCode::PrintScreen => 0x69,
        KeyCode::F14 | KeyCode::ScrollLock => 0x6B,
        KeyCode::F15 | KeyCode::Pause => 0x71,
        KeyCode::F16 => 0x6A,
        KeyCode::F17 => 0x40,
        KeyCode::F18 => 0x4F,
        KeyCode::F19 => 0x50,
        KeyCode::F20 => 0x5A,
        KeyCode::F21 | KeyCode::F22 | KeyCode::F23 | KeyCode::F24 => return None,

        KeyCode::LeftShift => 0x38,
        KeyCode::RightShift => 0x3C,
        KeyCode::LeftCtrl => 0x3B,
        KeyCode::RightCtrl => 0x3E,
        KeyCode::LeftAlt => 0x3A,
        KeyCode::RightAlt => 0x3D,
        KeyCode::LeftMeta => 0x37,
        KeyCode::RightMeta => 0x36,

        KeyCode::Space => 0x31,
        KeyCode::Enter => 0x24,
        KeyCode::Tab => 0x30,
        KeyCode::Escape => 0x35,
        KeyCode::Backspace => 0x33,
        KeyCode::Insert => 0x72, // Help
        KeyCode::Delete => 0x75, // Forward delete
        KeyCode::Home => 0x73,
        KeyCode::End => 0x77,
        KeyCode::PageUp => 0x74,
        KeyCode::PageDown => 0x79,
        KeyCode::Up => 0x7E,
        KeyCode::Down => 0x7D,
        KeyCode::Left => 0x7B,
        KeyCode::Right => 0x7C,
    };
    Some(vk)
}
