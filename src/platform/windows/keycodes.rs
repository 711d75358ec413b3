//! Windows virtual key codes for keybind injection.
//!
//! VK codes are from the Windows SDK (winuser.h). `keycode_to_vkcode`
//! returns `(vk, extra_flags)`; the flags come from `EXTENDED_KEYS`, the
//! table of VK codes that `SendInput` only delivers correctly with
//! `KEYEVENTF_EXTENDEDKEY` set. The executor ORs in `KEYEVENTF_KEYUP`
//! (0x0002) for key-up events.

use crate::platform::KeyCode;

/// `KEYEVENTF_EXTENDEDKEY` -- set in `KEYBDINPUT.dwFlags` for extended keys.
pub const EXTENDED: u32 = 0x0001;

pub const VK_RCONTROL: u16 = 0xA3;
pub const VK_RMENU: u16 = 0xA5;

/// `{VK code -> extra dwFlags}` for keys on the extended part of the
/// keyboard.
///
/// The first two entries, right Ctrl (163) and right Alt (165), are the
/// modifier quirk screenshot keybinds depend on. The navigation block
/// after them is an intentional extension: without the flag those keys
/// arrive as their numpad twins.
const EXTENDED_KEYS: &[(u16, u32)] = &[
    (VK_RCONTROL, EXTENDED),
    (VK_RMENU, EXTENDED),
    (0x2D, EXTENDED), // VK_INSERT
    (0x2E, EXTENDED), // VK_DELETE
    (0x24, EXTENDED), // VK_HOME
    (0x23, EXTENDED), // VK_END
    (0x21, EXTENDED), // VK_PRIOR
    (0x22, EXTENDED), // VK_NEXT
    (0x26, EXTENDED), // VK_UP
    (0x28, EXTENDED), // VK_DOWN
    (0x25, EXTENDED), // VK_LEFT
    (0x27, EXTENDED), // VK_RIGHT
];

/// Extra `dwFlags` bits required when injecting `vk`.
pub fn flags_for_vkcode(vk: u16) -> u32 {
    EXTENDED_KEYS
        .iter()
        .find(|(code, _)| *code == vk)
        .map_or(0, |(_, flags)| *flags)
}

/// Converts a canonical `KeyCode` to a Windows virtual key code and the
/// extra `dwFlags` bits for `KEYBDINPUT`.
pub fn keycode_to_vkcode(key: KeyCode) -> (u16, u32) {
    let vk = vkcode(key);
    (vk, flags_for_vkcode(vk))
}

fn vkcode(key: KeyCode) -> u16 {
    match key {
        // Letters and top-row digits share their ASCII code.
        KeyCode::A => 0x41,
        KeyCode::B => 0x42,
        KeyCode::C => 0x43,
        KeyCode::D => 0x44,
        KeyCode::E => 0x45,
        KeyCode::F => 0x46,
        KeyCode::G => 0x47,
        KeyCode::H => 0x48,
        KeyCode::I => 0x49,
        KeyCode::J => 0x4A,
        KeyCode::K => 0x4B,
        KeyCode::L => 0x4C,
        KeyCode::M => 0x4D,
        KeyCode::N => 0x4E,
        KeyCode::O => 0x4F,
        KeyCode::P => 0x50,
        KeyCode::Q => 0x51,
        KeyCode::R => 0x52,
        KeyCode::S => 0x53,
        KeyCode::T => 0x54,
        KeyCode::U => 0x55,
        KeyCode::V => 0x56,
        KeyCode::W => 0x57,
        KeyCode::X => 0x58,
        KeyCode::Y => 0x59,
        KeyCode::Z => 0x5A,
        KeyCode::Key0 => 0x30,
        KeyCode::Key1 => 0x31,
        KeyCode::Key2 => 0x32,
        KeyCode::Key3 => 0x33,
        KeyCode::Key4 => 0x34,
        KeyCode::Key5 => 0x35,
        KeyCode::Key6 => 0x36,
        KeyCode::Key7 => 0x37,
        KeyCode::Key8 => 0x38,
        KeyCode::Key9 => 0x39,

        // VK_F1 = 0x70 .. VK_F24 = 0x87
        KeyCode::F1 => 0x70,
        KeyCode::F2 => 0x71,
        KeyCode::F3 => 0x72,
        KeyCode::F4 => 0x73,
        KeyCode::F5 => 0x74,
        KeyCode::F6 => 0x75,
        KeyCode::F7 => 0x76,
        KeyCode::F8 => 0x77,
        KeyCode::F9 => 0x78,
        KeyCode::F10 => 0x79,
        KeyCode::F11 => 0x7A,
        KeyCode::F12 => 0x7B,
        KeyCode::F13 => 0x7C,
        KeyCode::F14 => 0x7D,
        KeyCode::F15 => 0x7E,
        KeyCode::F16 => 0x7F,
        KeyCode::F17 => 0x80,
        KeyCode::F18 => 0x81,
        KeyCode::F19 => 0x82,
        KeyCode::F20 => 0x83,
        KeyCode::F21 => 0x84,
        KeyCode::F22 => 0x85,
        KeyCode::F23 => 0x86,
        KeyCode::F24 => 0x87,

        KeyCode::LeftShift => 0xA0,
        KeyCode::RightShift => 0xA1,
        KeyCode::LeftCtrl => 0xA2,
        KeyCode::RightCtrl => VK_RCONTROL,
        KeyCode::LeftAlt => 0xA4,
        KeyCode::RightAlt => VK_RMENU,
        KeyCode::LeftMeta => 0x5B,
        KeyCode::RightMeta => 0x5C,

        KeyCode::Space => 0x20,
        KeyCode::Enter => 0x0D,
        KeyCode::Tab => 0x09,
        KeyCode::Escape => 0x1B,
        KeyCode::Backspace => 0x08,
        KeyCode::Insert => 0x2D,
        KeyCode::Delete => 0x2E,
        KeyCode::Home => 0x24,
        KeyCode::End => 0x23,
        KeyCode::PageUp => 0x21,
        KeyCode::PageDown => 0x22,
        KeyCode::Up => 0x26,
        KeyCode::Down => 0x28,
        KeyCode::Left => 0x25,
        KeyCode::Right => 0x27,

        KeyCode::PrintScreen => 0x2C,
        KeyCode::ScrollLock => 0x91,
        KeyCode::Pause => 0x13,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screenshot_keys_have_plain_codes() {
        assert_eq!(keycode_to_vkcode(KeyCode::F12), (0x7B, 0));
        assert_eq!(keycode_to_vkcode(KeyCode::PrintScreen), (0x2C, 0));
    }

    #[test]
    fn right_ctrl_and_right_alt_are_extended() {
        assert_eq!(keycode_to_vkcode(KeyCode::RightCtrl), (163, EXTENDED));
        assert_eq!(keycode_to_vkcode(KeyCode::RightAlt), (165, EXTENDED));
    }

    #[test]
    fn left_modifiers_are_not_extended() {
        for key in [KeyCode::LeftCtrl, KeyCode::LeftAlt, KeyCode::LeftShift] {
            let (_, flags) = keycode_to_vkcode(key);
            assert_eq!(flags, 0, "{key:?} should not carry EXTENDED");
        }
    }

    #[test]
    fn navigation_keys_carry_extended_flag() {
        for key in [KeyCode::Up, KeyCode::Home, KeyCode::PageDown, KeyCode::Delete] {
            let (_, flags) = keycode_to_vkcode(key);
            assert_eq!(flags, EXTENDED, "{key:?} should carry EXTENDED");
        }
    }

    #[test]
    fn unlisted_vkcode_has_no_flags() {
        assert_eq!(flags_for_vkcode(0x41), 0);
    }
}
