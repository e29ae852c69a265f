//! Mode controller: the one façade the application layer talks to.
//!
//! Owns the binding state and the lazily-enumerated monitor layout. Every
//! operation takes the window system and the render-surface window handle
//! explicitly; nothing is looked up from ambient state.

use crate::binder::WallpaperBinder;
use crate::error::Result;
use crate::monitors::MonitorLayout;
use crate::warn;
use crate::winsys::{WindowId, WindowSystem};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Windowed,
    Wallpaper,
}

/// Snapshot for UI display; a pure read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub mode: Mode,
    pub monitor_index: usize,
    pub monitor_count: usize,
}

pub struct ModeController {
    binder: WallpaperBinder,
    layout: Option<MonitorLayout>,
    mode: Mode,
}

impl ModeController {
    pub fn new(binder: WallpaperBinder) -> Self {
        Self {
            binder,
            layout: None,
            mode: Mode::Windowed,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Flip between windowed and wallpaper mode, returning the new mode.
    ///
    /// A failed bind leaves the state windowed; the caller decides whether
    /// and when to retry.
    pub fn toggle(&mut self, ws: &dyn WindowSystem, window: WindowId) -> Result<Mode> {
        match self.mode {
            Mode::Windowed => {
                let rect = self.layout_mut(ws)?.current_rect();
                self.binder.bind(ws, window, rect)?;
                self.mode = Mode::Wallpaper;
            }
            Mode::Wallpaper => {
                self.binder.unbind(ws, window)?;
                self.mode = Mode::Windowed;
            }
        }
        Ok(self.mode)
    }

    /// Select a monitor by index. In wallpaper mode the binding follows
    /// immediately; in windowed mode only the stored selection changes.
    pub fn set_monitor(&mut self, ws: &dyn WindowSystem, window: WindowId, index: usize) -> Result<()> {
        let (previous, rect) = {
            let layout = self.layout_mut(ws)?;
            let previous = layout.select(index)?;
            (previous, layout.current_rect())
        };
        if self.mode == Mode::Wallpaper && previous != index {
            self.binder.rebind(ws, window, rect)?;
        }
        Ok(())
    }

    /// Cycle to the next monitor, rebinding when wallpaper mode is engaged.
    /// Returns the selected index.
    pub fn next_monitor(&mut self, ws: &dyn WindowSystem, window: WindowId) -> Result<usize> {
        let (before, index, rect) = {
            let layout = self.layout_mut(ws)?;
            let before = layout.current_index();
            let index = layout.next();
            (before, index, layout.current_rect())
        };
        if self.mode == Mode::Wallpaper && index != before {
            self.binder.rebind(ws, window, rect)?;
        }
        Ok(index)
    }

    /// Cycle to the previous monitor, rebinding when wallpaper mode is
    /// engaged. Returns the selected index.
    pub fn previous_monitor(&mut self, ws: &dyn WindowSystem, window: WindowId) -> Result<usize> {
        let (before, index, rect) = {
            let layout = self.layout_mut(ws)?;
            let before = layout.current_index();
            let index = layout.previous();
            (before, index, layout.current_rect())
        };
        if self.mode == Mode::Wallpaper && index != before {
            self.binder.rebind(ws, window, rect)?;
        }
        Ok(index)
    }

    pub fn status(&self) -> Status {
        match &self.layout {
            Some(layout) => Status {
                mode: self.mode,
                monitor_index: layout.current_index(),
                monitor_count: layout.count(),
            },
            None => Status {
                mode: self.mode,
                monitor_index: 0,
                monitor_count: 0,
            },
        }
    }

    /// Monitor geometry is enumerated once, on first need, and kept for the
    /// life of the controller.
    fn layout_mut(&mut self, ws: &dyn WindowSystem) -> Result<&mut MonitorLayout> {
        let layout = match self.layout.take() {
            Some(layout) => layout,
            None => MonitorLayout::enumerate(ws).map_err(|e| {
                warn!("[BACKDROP][MODE] monitor enumeration failed: {e}");
                e
            })?,
        };
        Ok(self.layout.insert(layout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LocatorSettings;
    use crate::winsys::fake::FakeWindowSystem;
    use crate::winsys::{Rect, WindowFrame, ZPlacement};

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
                settle_attempts: 2,
            },
            WINDOWED,
        ))
    }

    fn desktop(monitors: &[Rect]) -> (FakeWindowSystem, WindowId) {
        let ws = FakeWindowSystem::new();
        ws.install_shell();
        for rect in monitors {
            ws.add_monitor(*rect);
        }
        let window = ws.create_window("BackdropHost", WINDOWED);
        (ws, window)
    }

    #[test]
    fn toggle_binds_to_the_current_monitor_and_back() {
        let monitor = Rect::new(0, 0, 1920, 1080);
        let (ws, window) = desktop(&[monitor]);
        let mut ctrl = controller();

        assert_eq!(ctrl.toggle(&ws, window).unwrap(), Mode::Wallpaper);
        assert_eq!(ws.rect_of(window), monitor);
        assert_eq!(ws.placement_of(window), Some(ZPlacement::Bottom));

        assert_eq!(ctrl.toggle(&ws, window).unwrap(), Mode::Windowed);
        assert_eq!(ws.parent_of(window), None);
        assert_eq!(ws.rect_of(window), WINDOWED);
    }

    #[test]
    fn failed_bind_leaves_the_mode_windowed() {
        let ws = FakeWindowSystem::new();
        // No shell installed: locate fails after monitor enumeration.
        ws.add_monitor(Rect::new(0, 0, 1920, 1080));
        let window = ws.create_window("BackdropHost", WINDOWED);
        let mut ctrl = controller();

        assert!(ctrl.toggle(&ws, window).is_err());
        assert_eq!(ctrl.mode(), Mode::Windowed);
        assert_eq!(ws.frame_of(window), WindowFrame::TopLevel);
    }

    #[test]
    fn toggle_with_no_monitors_reports_enumeration_failure() {
        let ws = FakeWindowSystem::new();
        let window = ws.create_window("BackdropHost", WINDOWED);
        let mut ctrl = controller();

        assert!(matches!(
            ctrl.toggle(&ws, window),
            Err(crate::error::WallpaperError::Enumeration(_))
        ));
        assert_eq!(ctrl.mode(), Mode::Windowed);
    }

    #[test]
    fn next_monitor_ten_times_on_one_monitor_changes_nothing() {
        let monitor = Rect::new(0, 0, 1920, 1080);
        let (ws, window) = desktop(&[monitor]);
        let mut ctrl = controller();
        ctrl.toggle(&ws, window).unwrap();

        for _ in 0..10 {
            assert_eq!(ctrl.next_monitor(&ws, window).unwrap(), 0);
            assert_eq!(ws.rect_of(window), monitor);
        }
        assert_eq!(ctrl.status().monitor_index, 0);
    }

    #[test]
    fn monitor_navigation_rebinds_while_in_wallpaper_mode() {
        let left = Rect::new(0, 0, 1920, 1080);
        let right = Rect::new(1920, 0, 3840, 1080);
        let (ws, window) = desktop(&[left, right]);
        let mut ctrl = controller();
        ctrl.toggle(&ws, window).unwrap();
        // The virtual midpoint (1920,540) sits on the seam between the two
        // monitors; half-open containment puts it on the right one.
        assert_eq!(ctrl.status().monitor_index, 1);
        assert_eq!(ws.rect_of(window), right);

        ctrl.next_monitor(&ws, window).unwrap();
        assert_eq!(ws.rect_of(window), left);
        ctrl.previous_monitor(&ws, window).unwrap();
        assert_eq!(ws.rect_of(window), right);
    }

    #[test]
    fn monitor_layout_is_enumerated_once_and_reused() {
        let (ws, window) = desktop(&[Rect::new(0, 0, 1920, 1080)]);
        let mut ctrl = controller();
        ctrl.toggle(&ws, window).unwrap();
        assert_eq!(ctrl.status().monitor_count, 1);

        // A monitor appearing afterwards is not picked up; the layout built
        // on first use stays authoritative.
        ws.add_monitor(Rect::new(1920, 0, 3840, 1080));
        ctrl.next_monitor(&ws, window).unwrap();
        assert_eq!(ctrl.status().monitor_count, 1);
        assert_eq!(ctrl.status().monitor_index, 0);
    }

    #[test]
    fn set_monitor_in_windowed_mode_only_stores_the_selection() {
        let (ws, window) = desktop(&[
            Rect::new(0, 0, 1920, 1080),
            Rect::new(1920, 0, 3840, 1080),
        ]);
        let mut ctrl = controller();

        // The layout defaults to the seam-owning right monitor; pick the
        // other one while still windowed.
        ctrl.set_monitor(&ws, window, 0).unwrap();
        assert_eq!(ctrl.status().monitor_index, 0);
        assert_eq!(ws.rect_of(window), WINDOWED);
        assert_eq!(ws.parent_of(window), None);

        // The stored selection takes effect on the next toggle.
        ctrl.toggle(&ws, window).unwrap();
        assert_eq!(ws.rect_of(window), Rect::new(0, 0, 1920, 1080));
    }

    #[test]
    fn set_monitor_out_of_range_reports_invalid_index() {
        let (ws, window) = desktop(&[Rect::new(0, 0, 1920, 1080)]);
        let mut ctrl = controller();
        let err = ctrl.set_monitor(&ws, window, 3).unwrap_err();
        assert!(matches!(
            err,
            crate::error::WallpaperError::InvalidIndex { index: 3, count: 1 }
        ));
        assert_eq!(ctrl.status().monitor_index, 0);
    }

    #[test]
    fn status_before_first_use_reports_an_empty_layout() {
        let ctrl = controller();
        let status = ctrl.status();
        assert_eq!(status.mode, Mode::Windowed);
        assert_eq!(status.monitor_count, 0);
    }
}
