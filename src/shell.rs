//! Shell worker-surface locator.
//!
//! The desktop shell keeps a hidden `WorkerW` window directly above the
//! wallpaper and below the desktop icons. It only exists after Progman is
//! asked to spawn it, and the shell recreates it at will, so the handle is
//! re-resolved on every binding session and never cached here.
//!
//! The whole heuristic is shell-version-dependent and deliberately confined
//! to [`locate_worker_surface`]; callers never see the hierarchy walk.

use std::time::Duration;

use crate::config::LocatorSettings;
use crate::error::{Result, WallpaperError};
use crate::info;
use crate::winsys::{WindowId, WindowSystem};

pub const PROGMAN_CLASS: &str = "Progman";
pub const DEFVIEW_CLASS: &str = "SHELLDLL_DefView";
pub const WORKERW_CLASS: &str = "WorkerW";

/// Undocumented Progman message that spawns the WorkerW hierarchy. The reply
/// carries no meaning; the side effect is everything.
pub const SPAWN_WORKER_MSG: u32 = 0x052C;
const SPAWN_WPARAM: usize = 0xD;
const SPAWN_LPARAM: isize = 0x1;

/// Resolve the shell's hidden worker surface.
///
/// Finds Progman, sends the spawn message with a bounded timeout, then polls
/// for the worker sibling: the shell creates it asynchronously on its own
/// thread, so the first searches may miss it. The poll is bounded by
/// `settle_attempts` searches spaced `settle_poll_ms` apart; there is no
/// guaranteed-correct synchronization point, only this grace window, and a
/// slow shell can still lose the race. Callers wanting resilience retry the
/// whole call themselves.
pub fn locate_worker_surface(
    ws: &dyn WindowSystem,
    settings: &LocatorSettings,
) -> Result<WindowId> {
    let progman = ws
        .find_window(PROGMAN_CLASS)
        .ok_or(WallpaperError::ShellNotFound)?;

    ws.send_message_timeout(
        progman,
        SPAWN_WORKER_MSG,
        SPAWN_WPARAM,
        SPAWN_LPARAM,
        settings.spawn_timeout_ms,
    );

    let attempts = settings.settle_attempts.max(1);
    for attempt in 0..attempts {
        if attempt > 0 {
            ws.sleep(Duration::from_millis(settings.settle_poll_ms));
        }
        if let Some(worker) = find_worker_sibling(ws) {
            info!(
                "[BACKDROP][SHELL] worker surface {:?} resolved after {} attempt(s)",
                worker,
                attempt + 1
            );
            return Ok(worker);
        }
    }

    Err(WallpaperError::WorkerSurfaceNotFound)
}

/// The worker surface is defined as the next top-level `WorkerW` enumerated
/// after the window hosting the desktop icon view (`SHELLDLL_DefView`).
fn find_worker_sibling(ws: &dyn WindowSystem) -> Option<WindowId> {
    for window in ws.top_level_windows() {
        if ws.find_child(window, DEFVIEW_CLASS).is_some() {
            return ws.find_window_after(window, WORKERW_CLASS);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::winsys::fake::FakeWindowSystem;

    fn settings() -> LocatorSettings {
        LocatorSettings {
            spawn_timeout_ms: 1000,
            settle_poll_ms: 25,
            settle_attempts: 4,
        }
    }

    #[test]
    fn locate_fails_without_progman_and_sends_nothing() {
        let ws = FakeWindowSystem::new();
        let err = locate_worker_surface(&ws, &settings()).unwrap_err();
        assert!(matches!(err, WallpaperError::ShellNotFound));
        assert!(ws.sent_messages().is_empty());
    }

    #[test]
    fn locate_finds_existing_worker_without_sleeping() {
        let ws = FakeWindowSystem::new();
        let worker = ws.install_shell();
        assert_eq!(locate_worker_surface(&ws, &settings()).unwrap(), worker);
        assert_eq!(ws.sleep_count(), 0);
    }

    #[test]
    fn locate_sends_spawn_handshake_to_progman() {
        let ws = FakeWindowSystem::new();
        ws.install_shell();
        locate_worker_surface(&ws, &settings()).unwrap();

        let messages = ws.sent_messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].msg, SPAWN_WORKER_MSG);
        assert_eq!(messages[0].wparam, 0xD);
        assert_eq!(messages[0].lparam, 0x1);
        assert_eq!(messages[0].timeout_ms, 1000);
    }

    #[test]
    fn locate_polls_until_async_worker_creation_lands() {
        let ws = FakeWindowSystem::new();
        ws.install_shell_without_worker();
        ws.spawn_worker_on_message();

        let worker = locate_worker_surface(&ws, &settings()).unwrap();
        assert!(ws.top_level_windows().contains(&worker));
        // First search misses, worker appears during the first settle sleep.
        assert_eq!(ws.sleep_count(), 1);
    }

    #[test]
    fn locate_fails_when_no_sibling_ever_appears() {
        let ws = FakeWindowSystem::new();
        ws.install_shell_without_worker();

        let err = locate_worker_surface(&ws, &settings()).unwrap_err();
        assert!(matches!(err, WallpaperError::WorkerSurfaceNotFound));
        // Exhausted the bounded poll: one immediate search plus three retries.
        assert_eq!(ws.sleep_count(), 3);
    }

    #[test]
    fn locate_fails_when_no_window_hosts_the_icon_view() {
        let ws = FakeWindowSystem::new();
        // Progman alone, no DefView host anywhere.
        ws.create_window(PROGMAN_CLASS, Default::default());
        let err = locate_worker_surface(&ws, &settings()).unwrap_err();
        assert!(matches!(err, WallpaperError::WorkerSurfaceNotFound));
    }
}
