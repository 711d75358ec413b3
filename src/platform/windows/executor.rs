//! Windows key injector via SendInput.
//!
//! Injection is synchronous: `SendInput` returns after the event is queued,
//! so no background thread is needed.

use windows_sys::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYEVENTF_KEYUP,
};

use super::keycodes::keycode_to_vkcode;
use crate::platform::{KeyCode, KeyInjector, KeyState, PlatformError};

/// Injects keyboard events via SendInput on Windows.
///
/// Stateless: each `inject()` call builds one `INPUT` record.
pub struct WindowsInjector;

impl WindowsInjector {
    pub fn new() -> Self {
        WindowsInjector
    }
}

/// Builds the `KEYBDINPUT` flags for one event.
fn event_flags(extra_flags: u32, state: KeyState) -> u32 {
    match state {
        KeyState::Down => extra_flags,
        KeyState::Up => extra_flags | KEYEVENTF_KEYUP,
    }
}

impl KeyInjector for WindowsInjector {
    fn inject(&self, key: KeyCode, state: KeyState) -> Result<(), PlatformError> {
        let (vk, extra_flags) = keycode_to_vkcode(key);
        let started = std::time::Instant::now();

        let input = INPUT {
            r#type: INPUT_KEYBOARD,
            Anonymous: INPUT_0 {
                ki: KEYBDINPUT {
                    wVk: vk,
                    wScan: 0,
                    dwFlags: event_flags(extra_flags, state),
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        };

        let sent = unsafe { SendInput(1, &input, std::mem::size_of::<INPUT>() as i32) };

        if sent == 0 {
            return Err(PlatformError::Other("SendInput returned 0".into()));
        }

        log::debug!(
            "executor: injected {:?} {:?} (vk {:#04x}) in {:.2}ms",
            key,
            state,
            vk,
            started.elapsed().as_secs_f64() * 1000.0
        );

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
