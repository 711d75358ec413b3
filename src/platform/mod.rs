//! Platform abstraction layer.
//!
//! Defines the `KeyInjector` trait and the canonical `KeyCode` set used by
//! screenshot keybinds. Platform-specific implementations live in child
//! modules; `create_key_injector` picks the one for the running system.

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "windows")]
mod windows;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Key model
// ---------------------------------------------------------------------------

/// Canonical key identifiers usable in a screenshot keybind.
///
/// Modifiers keep their left/right distinction: some capture tools bind to
/// the right-hand variant only, and Windows injects those with a different
/// flag set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum KeyCode {
    // Letters
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,

    // Top-row digits
    Key0,
    Key1,
    Key2,
    Key3,
    Key4,
    Key5,
    Key6,
    Key7,
    Key8,
    Key9,

    // Function keys
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    F13,
    F14,
    F15,
    F16,
    F17,
    F18,
    F19,
    F20,
    F21,
    F22,
    F23,
    F24,

    // Modifiers
    #[serde(alias = "Shift")]
    LeftShift,
    RightShift,
    #[serde(alias = "Ctrl")]
    LeftCtrl,
    RightCtrl,
    #[serde(alias = "Alt")]
    LeftAlt,
    RightAlt,
    #[serde(alias = "Meta")]
    LeftMeta,
    RightMeta,

    // Navigation and editing
    Space,
    Enter,
    Tab,
    Escape,
    Backspace,
    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,

    // System keys
    PrintScreen,
    ScrollLock,
    Pause,
}

/// Direction of a synthetic key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Down,
    Up,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// No usable injection facility in this session.
    #[error("input injection unavailable: {0}")]
    Unavailable(String),
    #[error("{0}")]
    Other(String),
}

// ---------------------------------------------------------------------------
// Injector trait
// ---------------------------------------------------------------------------

/// Sends one synthetic key event to the OS.
///
/// Implementations must not block the caller for longer than the OS call
/// itself: `inject` runs on the host's frame callback.
pub trait KeyInjector {
    fn inject(&self, key: KeyCode, state: KeyState) -> Result<(), PlatformError>;
}

/// Logs key events instead of sending them (`--dry-run`).
#[derive(Debug, Default)]
pub struct DryRunInjector;

impl KeyInjector for DryRunInjector {
    fn inject(&self, key: KeyCode, state: KeyState) -> Result<(), PlatformError> {
        log::info!("executor: (dry run) {:?} {:?}", key, state);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

#[cfg(target_os = "linux")]
pub use linux::create_key_injector;
#[cfg(target_os = "macos")]
pub use macos::create_key_injector;
#[cfg(target_os = "windows")]
pub use windows::create_key_injector;

/// Returns the injection backend for the current platform and session.
#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
pub fn create_key_injector() -> Result<Box<dyn KeyInjector>, PlatformError> {
    Err(PlatformError::Unavailable(
        "no key injection backend for this platform".into(),
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
