//! End-to-end exercise of the integration subsystem against the in-memory
//! window system: the same sequence of operations the demo loop performs in
//! response to user input.

use backdrop::binder::WallpaperBinder;
use backdrop::config::LocatorSettings;
use backdrop::controller::{Mode, ModeController};
use backdrop::winsys::fake::FakeWindowSystem;
use backdrop::winsys::{Rect, WindowFrame, ZPlacement};

const WINDOWED: Rect = Rect {
    left: 100,
    top: 100,
    right: 900,
    bottom: 550,
};

fn controller() -> ModeController {
    ModeController::new(WallpaperBinder::new(
        LocatorSettings {
            spawn_timeout_ms: 1000,
            settle_poll_ms: 25,
            settle_attempts: 4,
        },
        WINDOWED,
    ))
}

#[test]
fn full_session_toggle_navigate_and_restore() {
    let left = Rect::new(-1920, 0, 0, 1080);
    let center = Rect::new(0, 0, 1920, 1080);
    let right = Rect::new(1920, 0, 3840, 1080);

    let ws = FakeWindowSystem::new();
    let worker = ws.install_shell();
    // Enumeration order matches spec'd virtual-screen scenario; the center
    // monitor holds the virtual midpoint.
    ws.add_monitor(center);
    ws.add_monitor(right);
    ws.add_monitor(left);
    let window = ws.create_window("BackdropHost", WINDOWED);

    let mut ctrl = controller();
    assert_eq!(ctrl.status().mode, Mode::Windowed);

    // Engage wallpaper mode on the center monitor.
    assert_eq!(ctrl.toggle(&ws, window).unwrap(), Mode::Wallpaper);
    let status = ctrl.status();
    assert_eq!((status.monitor_index, status.monitor_count), (0, 3));
    assert_eq!(ws.parent_of(window), Some(worker));
    assert_eq!(ws.frame_of(window), WindowFrame::BorderlessChild);
    assert_eq!(ws.rect_of(window), center);
    assert_eq!(ws.placement_of(window), Some(ZPlacement::Bottom));

    // Cycle across all monitors and wrap back around.
    assert_eq!(ctrl.next_monitor(&ws, window).unwrap(), 1);
    assert_eq!(ws.rect_of(window), right);
    assert_eq!(ctrl.next_monitor(&ws, window).unwrap(), 2);
    assert_eq!(ws.rect_of(window), left);
    assert_eq!(ctrl.next_monitor(&ws, window).unwrap(), 0);
    assert_eq!(ws.rect_of(window), center);

    // Jump directly, then disengage.
    ctrl.set_monitor(&ws, window, 2).unwrap();
    assert_eq!(ws.rect_of(window), left);

    assert_eq!(ctrl.toggle(&ws, window).unwrap(), Mode::Windowed);
    assert_eq!(ws.parent_of(window), None);
    assert_eq!(ws.frame_of(window), WindowFrame::TopLevel);
    assert_eq!(ws.rect_of(window), WINDOWED);
    assert_eq!(ws.placement_of(window), Some(ZPlacement::Top));

    // Selection survives the windowed interlude and a worker recreation.
    let new_worker = ws.recreate_worker();
    assert_eq!(ctrl.toggle(&ws, window).unwrap(), Mode::Wallpaper);
    assert_eq!(ws.parent_of(window), Some(new_worker));
    assert_eq!(ws.rect_of(window), left);
}

#[test]
fn deferred_worker_creation_still_binds() {
    let monitor = Rect::new(0, 0, 2560, 1440);
    let ws = FakeWindowSystem::new();
    ws.install_shell_without_worker();
    ws.spawn_worker_on_message();
    ws.add_monitor(monitor);
    let window = ws.create_window("BackdropHost", WINDOWED);

    let mut ctrl = controller();
    assert_eq!(ctrl.toggle(&ws, window).unwrap(), Mode::Wallpaper);
    assert_eq!(ws.rect_of(window), monitor);
    assert!(ws.sleep_count() >= 1);
}
