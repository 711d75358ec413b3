//! macOS platform backend: CGEventPost injection.
//!
//! Posting synthetic events requires Accessibility permission. Without it
//! the events are silently dropped by the window server. Guide the user to:
//!   System Settings > Privacy & Security > Accessibility

mod executor;
mod keycodes;

use executor::MacOSInjector;

use crate::platform::{KeyInjector, PlatformError};

/// Returns the CGEventPost-based key injector.
pub fn create_key_injector() -> Result<Box<dyn KeyInjector>, PlatformError> {
    Ok(Box::new(MacOSInjector::new()))
}
