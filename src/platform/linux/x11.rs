//! X11 key injector via the XTest extension.
//!
//! Used for pure X11 sessions. Every event is flushed immediately so the
//! press reaches the server before the matching release is built.

use x11rb::connection::{Connection, RequestConnection};
use x11rb::protocol::xproto::{Window, KEY_PRESS_EVENT, KEY_RELEASE_EVENT};
use x11rb::protocol::xtest::{self, ConnectionExt as _};
use x11rb::rust_connection::RustConnection;

use super::keycodes::keycode_to_x11;
use crate::platform::{KeyCode, KeyInjector, KeyState, PlatformError};

pub struct X11Injector {
    conn: RustConnection,
    root: Window,
}

fn other(e: impl std::fmt::Display) -> PlatformError {
    PlatformError::Other(e.to_string())
}

impl X11Injector {
    /// Connects to `$DISPLAY` and checks that XTest is available.
    pub fn connect() -> Result<Self, PlatformError> {
        let (conn, screen_num) = x11rb::connect(None).map_err(other)?;

        if conn
            .extension_information(xtest::X11_EXTENSION_NAME)
            .map_err(other)?
            .is_none()
        {
            return Err(PlatformError::Unavailable(
                "X server does not support the XTEST extension".into(),
            ));
        }

        let root = conn
            .setup()
            .roots
            .get(screen_num)
            .map(|screen| screen.root)
            .ok_or_else(|| PlatformError::Other(format!("no X screen {screen_num}")))?;

        log::info!("executor: XTest injection on screen {screen_num}");
        Ok(Self { conn, root })
    }
}

fn event_type(state: KeyState) -> u8 {
    match state {
        KeyState::Down => KEY_PRESS_EVENT,
        KeyState::Up => KEY_RELEASE_EVENT,
    }
}

impl KeyInjector for X11Injector {
    fn inject(&self, key: KeyCode, state: KeyState) -> Result<(), PlatformError> {
        let keycode = keycode_to_x11(key);
        self.conn
            .xtest_fake_input(event_type(state), keycode, x11rb::CURRENT_TIME, self.root, 0, 0, 0)
            .map_err(other)?;
        self.conn.flush().map_err(other)?;
        log::debug!("executor: injected {:?} {:?} (x11 keycode {})", key, state, keycode);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_states_map_to_core_event_types() {
        assert_eq!(event_type(KeyState::Down), 2);
        assert_eq!(event_type(KeyState::Up), 3);
    }
}
