//! Screenshot firing decisions and keybind injection.

use std::rc::Rc;
use std::time::Duration;

use crate::platform::{KeyCode, KeyInjector, KeyState};
use crate::scheduler::Scheduler;
use crate::store::LevelOverride;

/// Presses every key of `keys` in order, then releases them in the same
/// order.
///
/// A failed event is logged and the sequence continues, so a key that was
/// pressed is always offered its release.
pub fn press_keybind(injector: &dyn KeyInjector, keys: &[KeyCode]) {
    let mut failures = 0;
    for state in [KeyState::Down, KeyState::Up] {
        for &key in keys {
            if let Err(e) = injector.inject(key, state) {
                log::warn!("trigger: failed to send {:?} {:?}: {e}", key, state);
                failures += 1;
            }
        }
    }

    if failures == 0 {
        log::info!("trigger: screenshot keybind sent");
    } else {
        log::error!(
            "trigger: screenshot keybind sent with {failures} of {} events failing",
            keys.len() * 2
        );
    }
}

/// Decides when a level event deserves a screenshot and sends the keybind.
pub struct ScreenshotTrigger {
    injector: Rc<dyn KeyInjector>,
    keybind: Rc<[KeyCode]>,
}

impl ScreenshotTrigger {
    pub fn new(injector: Rc<dyn KeyInjector>, keybind: impl Into<Rc<[KeyCode]>>) -> Self {
        Self {
            injector,
            keybind: keybind.into(),
        }
    }

    pub fn keybind(&self) -> &[KeyCode] {
        &self.keybind
    }

    /// A new best is captured once it reaches the level's threshold.
    pub fn should_fire_on_progress(active: &LevelOverride, percent: i32) -> bool {
        active.screenshot_on_new_best && percent >= i32::from(active.percent)
    }

    pub fn should_fire_on_complete(active: &LevelOverride, percent: i32) -> bool {
        active.screenshot_on_complete && percent >= 100
    }

    /// Schedules one keybind press `delay` from now on the host clock.
    ///
    /// Fire-and-forget: the press cannot be cancelled and is not retried.
    pub fn fire(&self, scheduler: &dyn Scheduler, delay: Duration) {
        let injector = Rc::clone(&self.injector);
        let keybind = Rc::clone(&self.keybind);
        log::debug!("trigger: screenshot scheduled in {:.2}s", delay.as_secs_f32());
        scheduler.schedule(
            delay,
            Box::new(move || press_keybind(injector.as_ref(), &keybind)),
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
