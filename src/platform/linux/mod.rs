//! Linux platform backend.
//!
//! Injection path depends on the session:
//! 1. `WAYLAND_DISPLAY` set  → RemoteDesktop portal (`LinuxWaylandInjector`)
//! 2. `DISPLAY` only (X11)   → XTest extension (`X11Injector`)
//! 3. Neither variable set   → no display, clear error
//!
//! Under XWayland both variables are set; the portal path wins because
//! XTest events would only reach X11 clients.

mod keycodes;
mod wayland;
mod x11;

use std::env;

use wayland::LinuxWaylandInjector;
use x11::X11Injector;

use crate::platform::{KeyInjector, PlatformError};

/// Injection backend chosen from the session environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    WaylandPortal,
    X11Test,
}

fn env_flag(name: &str) -> bool {
    env::var_os(name).is_some_and(|v| !v.is_empty())
}

/// Picks the backend from display variable presence.
fn select_backend(has_wayland: bool, has_display: bool) -> Option<Backend> {
    match (has_wayland, has_display) {
        (true, _) => Some(Backend::WaylandPortal),
        (false, true) => Some(Backend::X11Test),
        (false, false) => None,
    }
}

/// Returns the appropriate `KeyInjector` for the current session.
pub fn create_key_injector() -> Result<Box<dyn KeyInjector>, PlatformError> {
    match select_backend(env_flag("WAYLAND_DISPLAY"), env_flag("DISPLAY")) {
        Some(Backend::WaylandPortal) => {
            LinuxWaylandInjector::new().map(|i| Box::new(i) as Box<dyn KeyInjector>)
        }
        Some(Backend::X11Test) => {
            X11Injector::connect().map(|i| Box::new(i) as Box<dyn KeyInjector>)
        }
        None => Err(PlatformError::Unavailable(
            "No display server detected.".into(),
        )),
    }
}
