//! macOS key injector via CGEventPost.
//!
//! Injection is synchronous: `CGEventPost` delivers the event before
//! returning, so no background thread is needed.

use std::ffi::c_void;

use super::keycodes::keycode_to_vkcode;
use crate::platform::{KeyCode, KeyInjector, KeyState, PlatformError};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// CGEventTapLocation: kCGSessionEventTap. The game receives the event like
/// any user keystroke in the login session.
const CG_SESSION_EVENT_TAP: u32 = 1;

/// kCGEventSourceStateHIDSystemState = 1 -- use the real HID hardware state.
const CG_EVENT_SOURCE_STATE_HID_SYSTEM_STATE: i32 = 1;

// ---------------------------------------------------------------------------
// Raw FFI
// ---------------------------------------------------------------------------

type CGEventRef = *mut c_void;
type CGEventSourceRef = *mut c_void;

#[link(name = "ApplicationServices", kind = "framework")]
extern "C" {
    fn CGEventSourceCreate(state_id: i32) -> CGEventSourceRef;
    fn CGEventCreateKeyboardEvent(
        source: CGEventSourceRef,
        virtual_key: u16,
        key_down: bool,
    ) -> CGEventRef;
    fn CGEventPost(tap_location: u32, event: CGEventRef);
}

#[link(name = "CoreFoundation", kind = "framework")]
extern "C" {
    fn CFRelease(cf: *const c_void);
}

// ---------------------------------------------------------------------------
// Public struct
// ---------------------------------------------------------------------------

/// Injects keyboard events via CGEventPost on macOS.
///
/// Stateless: each `inject()` call creates a `CGEvent`, posts it, and
/// releases it immediately.
pub struct MacOSInjector;

impl MacOSInjector {
    pub fn new() -> Self {
        MacOSInjector
    }
}

impl KeyInjector for MacOSInjector {
    fn inject(&self, key: KeyCode, state: KeyState) -> Result<(), PlatformError> {
        let Some(vkcode) = keycode_to_vkcode(key) else {
            log::warn!("executor: no macOS key code for {:?}, skipping", key);
            return Ok(());
        };

        let key_down = state == KeyState::Down;
        let started = std::time::Instant::now();

        unsafe {
            let source = CGEventSourceCreate(CG_EVENT_SOURCE_STATE_HID_SYSTEM_STATE);
            if source.is_null() {
                return Err(PlatformError::Other(
                    "CGEventSourceCreate returned null".into(),
                ));
            }

            let event = CGEventCreateKeyboardEvent(source, vkcode, key_down);
            if event.is_null() {
                CFRelease(source.cast::<c_void>());
                return Err(PlatformError::Other(
                    "CGEventCreateKeyboardEvent returned null".into(),
                ));
            }

            CGEventPost(CG_SESSION_EVENT_TAP, event);
            CFRelease(event.cast::<c_void>());
            CFRelease(source.cast::<c_void>());
        }

        log::debug!(
            "executor: injected {:?} {:?} in {:.2}ms",
            key,
            state,
            started.elapsed().as_secs_f64() * 1000.0
        );

        Ok(())
    }
}
