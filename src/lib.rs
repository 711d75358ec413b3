//! autoshot -- automatic screenshot keybind for level progress.
//!
//! The host game calls into a `SessionContext` through `LifecycleListener`.
//! On a qualifying new best or completion the configured keybind is sent
//! through the platform `KeyInjector` after a delay on the host clock.
//! Per-level settings that differ from the user defaults are kept in a
//! small binary file by `SettingsStore`.

pub mod config;
pub mod host;
pub mod platform;
pub mod scheduler;
pub mod session;
pub mod store;
pub mod trigger;

pub use config::{Config, HostSettings};
pub use scheduler::{FrameScheduler, Scheduler};
pub use session::{LifecycleListener, SessionContext};
pub use store::{Defaults, LevelOverride, SettingsStore};
pub use trigger::ScreenshotTrigger;
