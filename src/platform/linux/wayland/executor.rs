//! Wayland key injector via the xdg-desktop-portal RemoteDesktop portal.
//!
//! `LinuxWaylandInjector::new()` spawns a background thread owning a
//! single-threaded tokio runtime. That runtime sets up the portal session
//! and then loops over queued key events. `inject()` only enqueues with the
//! non-blocking `try_send()`, so it is safe to call from the host's frame
//! callback.

use std::path::PathBuf;
use std::thread;

use ashpd::desktop::{
    remote_desktop::{DeviceType, KeyState as PortalKeyState, RemoteDesktop},
    PersistMode,
};
use tokio::sync::mpsc;

use super::super::keycodes::keycode_to_evdev;
use crate::platform::{KeyCode, KeyInjector, KeyState, PlatformError};

/// One queued key event.
struct KeyEventCmd {
    /// Linux evdev keycode.
    keycode: i32,
    state: PortalKeyState,
    queued_at: std::time::Instant,
}

/// Injects keyboard events via xdg-desktop-portal RemoteDesktop on Wayland.
pub struct LinuxWaylandInjector {
    cmd_tx: mpsc::Sender<KeyEventCmd>,
    thread: Option<thread::JoinHandle<()>>,
}

/// Channel capacity for pending key events. A keybind is a handful of keys
/// fired at most a few times per level, so this never fills in practice.
const CMD_CAPACITY: usize = 64;

impl LinuxWaylandInjector {
    /// Creates the injector and launches the background portal session.
    ///
    /// Events injected before the session is ready stay queued and are sent
    /// once the user has granted access.
    pub fn new() -> Result<Self, PlatformError> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<KeyEventCmd>(CMD_CAPACITY);

        let thread = thread::Builder::new()
            .name("autoshot-portal".into())
            .spawn(move || {
                let rt = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(rt) => rt,
                    Err(e) => {
                        log::error!("executor: failed to build tokio runtime: {e}");
                        return;
                    }
                };
                rt.block_on(run_portal(cmd_rx));
            })
            .map_err(|e| PlatformError::Other(format!("failed to spawn portal thread: {e}")))?;

        Ok(Self {
            cmd_tx,
            thread: Some(thread),
        })
    }
}

impl Drop for LinuxWaylandInjector {
    fn drop(&mut self) {
        // Dropping cmd_tx closes the channel and ends the portal loop; the
        // thread is detached rather than joined so shutdown never blocks.
        drop(self.thread.take());
    }
}

impl KeyInjector for LinuxWaylandInjector {
    fn inject(&self, key: KeyCode, state: KeyState) -> Result<(), PlatformError> {
        let portal_state = match state {
            KeyState::Down => PortalKeyState::Pressed,
            KeyState::Up => PortalKeyState::Released,
        };

        match self.cmd_tx.try_send(KeyEventCmd {
            keycode: keycode_to_evdev(key) as i32,
            state: portal_state,
            queued_at: std::time::Instant::now(),
        }) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => {
                log::warn!("executor: injection queue full, {:?} {:?} dropped", key, state);
                Ok(())
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                Err(PlatformError::Other("portal session closed".into()))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Portal task
// ---------------------------------------------------------------------------

async fn run_portal(mut cmd_rx: mpsc::Receiver<KeyEventCmd>) {
    if let Err(e) = portal_loop(&mut cmd_rx).await {
        log::error!("executor: {e}");
    }
}

async fn portal_loop(
    cmd_rx: &mut mpsc::Receiver<KeyEventCmd>,
) -> Result<(), Box<dyn std::error::Error>> {
    let portal = RemoteDesktop::new().await?;
    let session = portal.create_session().await?;

    let grant = PortalGrant::in_config_dir();
    let saved_token = grant.as_ref().and_then(PortalGrant::token);
    if saved_token.is_some() {
        log::debug!("executor: reusing saved portal grant");
    }
    portal
        .select_devices(
            &session,
            DeviceType::Keyboard.into(),
            saved_token.as_deref(),
            PersistMode::ExplicitlyRevoked,
        )
        .await?;

    let start_response = portal.start(&session, None).await?;
    if let (Some(grant), Some(token)) = (&grant, start_response.response()?.restore_token()) {
        match grant.remember(token) {
            Ok(()) => log::debug!("executor: portal grant saved to {}", grant.path.display()),
            Err(e) => log::warn!("executor: could not save portal grant: {e}"),
        }
    }

    log::info!("executor: RemoteDesktop session active");

    while let Some(cmd) = cmd_rx.recv().await {
        match portal
            .notify_keyboard_keycode(&session, cmd.keycode, cmd.state)
            .await
        {
            Ok(_) => log::debug!(
                "executor: injected keycode {} after {:.2}ms",
                cmd.keycode,
                cmd.queued_at.elapsed().as_secs_f64() * 1000.0
            ),
            Err(e) => log::warn!("executor: notify_keyboard_keycode failed: {e}"),
        }
    }

    log::info!("executor: injection queue closed, exiting");
    Ok(())
}

// ---------------------------------------------------------------------------
// Restore token
// ---------------------------------------------------------------------------

/// Remembered portal grant. With a token on disk the portal reuses the
/// user's earlier consent instead of asking again on every game launch.
struct PortalGrant {
    path: PathBuf,
}

impl PortalGrant {
    /// `$XDG_CONFIG_HOME/autoshot/remote-desktop-token`.
    fn in_config_dir() -> Option<Self> {
        crate::config::config_dir().map(|dir| Self {
            path: dir.join("remote-desktop-token"),
        })
    }

    /// Token from a previous run; blank or unreadable files count as none.
    fn token(&self) -> Option<String> {
        let text = std::fs::read_to_string(&self.path).ok()?;
        let token = text.trim();
        (!token.is_empty()).then(|| token.to_owned())
    }

    fn remember(&self, token: &str) -> std::io::Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&self.path, token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn injector_with(cmd_tx: mpsc::Sender<KeyEventCmd>) -> LinuxWaylandInjector {
        LinuxWaylandInjector {
            cmd_tx,
            thread: None,
        }
    }

    #[test]
    fn inject_queues_evdev_code() {
        let (cmd_tx, mut cmd_rx) = mpsc::channel::<KeyEventCmd>(4);
        let injector = injector_with(cmd_tx);

        injector.inject(KeyCode::F12, KeyState::Down).unwrap();
        injector.inject(KeyCode::F12, KeyState::Up).unwrap();

        let down = cmd_rx.try_recv().unwrap();
        assert_eq!(down.keycode, 88);
        assert!(matches!(down.state, PortalKeyState::Pressed));
        let up = cmd_rx.try_recv().unwrap();
        assert!(matches!(up.state, PortalKeyState::Released));
    }

    #[test]
    fn full_queue_drops_event_without_error() {
        let (cmd_tx, _cmd_rx) = mpsc::channel::<KeyEventCmd>(1);
        let injector = injector_with(cmd_tx);

        injector.inject(KeyCode::A, KeyState::Down).unwrap();
        assert!(injector.inject(KeyCode::A, KeyState::Up).is_ok());
    }

    #[test]
    fn grant_round_trips_and_ignores_blank_files() {
        let dir = tempfile::tempdir().unwrap();
        let grant = PortalGrant {
            path: dir.path().join("autoshot").join("remote-desktop-token"),
        };
        assert_eq!(grant.token(), None);

        grant.remember("abc-123\n").unwrap();
        assert_eq!(grant.token().as_deref(), Some("abc-123"));

        grant.remember("   ").unwrap();
        assert_eq!(grant.token(), None);
    }

    #[test]
    fn closed_queue_is_an_error() {
        let (cmd_tx, cmd_rx) = mpsc::channel::<KeyEventCmd>(1);
        drop(cmd_rx);
        let injector = injector_with(cmd_tx);

        assert!(injector.inject(KeyCode::A, KeyState::Down).is_err());
    }
}
