//! Glue between host lifecycle callbacks and the settings store.
//!
//! `SessionContext` owns everything the callbacks share: the store, the
//! override of the level being played and the screenshot trigger. All
//! methods run on the host's callback thread; errors are logged and never
//! returned to the host.

use std::rc::Rc;

use crate::config::HostSettings;
use crate::scheduler::Scheduler;
use crate::store::{LevelOverride, SettingsStore, UpsertOutcome};
use crate::trigger::ScreenshotTrigger;

/// Host events the core reacts to.
pub trait LifecycleListener {
    /// Application start, before any level is played.
    fn on_launch(&mut self);
    fn on_session_start(&mut self, level_id: i32);
    fn on_session_end(&mut self);
    /// The player set a new best at `percent`.
    fn on_progress(&mut self, percent: i32);
    fn on_complete(&mut self, percent: i32);
    /// The host is saving its own data.
    fn on_save(&mut self);
}

pub struct SessionContext<S: HostSettings> {
    settings: S,
    store: SettingsStore,
    active: Option<LevelOverride>,
    trigger: ScreenshotTrigger,
    scheduler: Rc<dyn Scheduler>,
}

impl<S: HostSettings> SessionContext<S> {
    pub fn new(
        settings: S,
        store: SettingsStore,
        trigger: ScreenshotTrigger,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        Self {
            settings,
            store,
            active: None,
            trigger,
            scheduler,
        }
    }

    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }

    /// Override in effect for the level being played.
    pub fn active(&self) -> Option<&LevelOverride> {
        self.active.as_ref()
    }

    // -----------------------------------------------------------------------
    // Popup operations
    // -----------------------------------------------------------------------

    /// Flips "screenshot on new best" for the current level.
    pub fn toggle_new_best(&mut self) -> Option<bool> {
        let active = self.active.as_mut()?;
        active.screenshot_on_new_best = !active.screenshot_on_new_best;
        Some(active.screenshot_on_new_best)
    }

    /// Flips "screenshot on complete" for the current level.
    pub fn toggle_complete(&mut self) -> Option<bool> {
        let active = self.active.as_mut()?;
        active.screenshot_on_complete = !active.screenshot_on_complete;
        Some(active.screenshot_on_complete)
    }

    /// Applies the popup's percent text box to the current level and
    /// returns the resulting threshold.
    pub fn set_percent_from_input(&mut self, input: &str) -> Option<i16> {
        let active = self.active.as_mut()?;
        active.percent = parse_percent_input(input, active.percent);
        Some(active.percent)
    }
}

/// Interprets the percent text box.
///
/// Empty input keeps `previous`; so does anything that is not a number.
/// Numbers are clamped to 1..=100.
pub fn parse_percent_input(input: &str, previous: i16) -> i16 {
    let input = input.trim();
    if input.is_empty() {
        return previous;
    }
    match input.parse::<i64>() {
        Ok(value) => value.clamp(1, 100) as i16,
        Err(_) if input.bytes().all(|b| b.is_ascii_digit()) => 100,
        Err(e) => {
            log::warn!("session: ignoring percent input {input:?}: {e}");
            previous
        }
    }
}

impl<S: HostSettings> LifecycleListener for SessionContext<S> {
    fn on_launch(&mut self) {
        match self.store.load() {
            Ok(_) => {}
            Err(e) if e.is_missing_file() => log::warn!(
                "session: no settings file at {}, using defaults",
                self.store.path().display()
            ),
            Err(e) => log::error!("session: settings not loaded: {e}"),
        }
    }

    fn on_session_start(&mut self, level_id: i32) {
        if self.active.is_some() {
            log::warn!("session: level {level_id} started while another was active");
            self.on_session_end();
        }

        let active = match self.store.find(level_id) {
            Some(found) => *found,
            None => LevelOverride::from_defaults(level_id, &self.settings.defaults()),
        };
        log::debug!("session: level {level_id} started with {active:?}");
        self.active = Some(active);
    }

    fn on_session_end(&mut self) {
        let Some(active) = self.active.take() else {
            log::debug!("session: end without an active level");
            return;
        };
        let outcome = self.store.upsert(active, &self.settings.defaults());
        if outcome != UpsertOutcome::Unchanged {
            log::debug!("session: level {} ended, store {:?}", active.id, outcome);
        }
    }

    fn on_progress(&mut self, percent: i32) {
        let Some(active) = &self.active else { return };
        if ScreenshotTrigger::should_fire_on_progress(active, percent) {
            log::info!("session: new best {percent}% on level {}, taking screenshot", active.id);
            self.trigger.fire(self.scheduler.as_ref(), self.settings.delay());
        }
    }

    fn on_complete(&mut self, percent: i32) {
        let Some(active) = &self.active else { return };
        if ScreenshotTrigger::should_fire_on_complete(active, percent) {
            log::info!("session: level {} completed, taking screenshot", active.id);
            self.trigger.fire(self.scheduler.as_ref(), self.settings.delay());
        }
    }

    fn on_save(&mut self) {
        if let Err(e) = self.store.save(&self.settings.defaults()) {
            log::error!("session: settings not saved: {e}");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
