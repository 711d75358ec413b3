//! Windows platform backend: SendInput injection.
//!
//! The factory returns a boxed `WindowsInjector`. No permission is needed to
//! inject into the foreground application.

mod executor;
pub mod keycodes;

use executor::WindowsInjector;

use crate::platform::{KeyInjector, PlatformError};

/// Returns a `WindowsInjector` backed by `SendInput`.
pub fn create_key_injector() -> Result<Box<dyn KeyInjector>, PlatformError> {
    Ok(Box::new(WindowsInjector::new()))
}
