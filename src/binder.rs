//! Attaches and detaches the render-surface window from the shell's worker
//! surface.
//!
//! The worker handle is re-resolved on every bind and rebind: the shell may
//! tear its WorkerW down and recreate it between sessions, so a cached handle
//! is assumed stale the moment a binding ends.

use crate::config::LocatorSettings;
use crate::error::{Result, WallpaperError};
use crate::shell::locate_worker_surface;
use crate::winsys::{Rect, WindowFrame, WindowId, WindowSystem, ZPlacement};
use crate::{info, warn};

pub struct WallpaperBinder {
    locator: LocatorSettings,
    windowed_rect: Rect,
}

impl WallpaperBinder {
    pub fn new(locator: LocatorSettings, windowed_rect: Rect) -> Self {
        Self {
            locator,
            windowed_rect,
        }
    }

    /// Parent `window` into the worker surface, clipped to `monitor_rect`.
    ///
    /// Style, reparent and reposition are verified in that order; a rejected
    /// reparent rolls the style back so the window is never left half-bound.
    pub fn bind(&self, ws: &dyn WindowSystem, window: WindowId, monitor_rect: Rect) -> Result<()> {
        let worker = locate_worker_surface(ws, &self.locator)?;
        self.attach(ws, window, worker, monitor_rect, true)
    }

    /// Move an existing binding to a new monitor rectangle.
    ///
    /// Equivalent to unbind-then-bind; the restyle is skipped when the window
    /// is already a child, which is not observable from the outside.
    pub fn rebind(&self, ws: &dyn WindowSystem, window: WindowId, monitor_rect: Rect) -> Result<()> {
        let worker = locate_worker_surface(ws, &self.locator)?;
        let restyle = ws.parent(window).is_none();
        self.attach(ws, window, worker, monitor_rect, restyle)
    }

    /// Restore `window` to a normal top-level window at the default windowed
    /// rectangle. A no-op success when the window is already unbound.
    pub fn unbind(&self, ws: &dyn WindowSystem, window: WindowId) -> Result<()> {
        if ws.parent(window).is_none() {
            return Ok(());
        }
        if !ws.set_frame_style(window, WindowFrame::TopLevel) {
            return Err(WallpaperError::Bind(
                "restoring the top-level window style was rejected".to_string(),
            ));
        }
        if !ws.set_parent(window, None) {
            return Err(WallpaperError::Bind(
                "detaching from the worker surface was rejected".to_string(),
            ));
        }
        if !ws.position_window(window, self.windowed_rect, ZPlacement::Top) {
            return Err(WallpaperError::Bind(
                "restoring the windowed rectangle was rejected".to_string(),
            ));
        }
        info!("[BACKDROP][BIND] window {:?} restored to windowed mode", window);
        Ok(())
    }

    fn attach(
        &self,
        ws: &dyn WindowSystem,
        window: WindowId,
        worker: WindowId,
        rect: Rect,
        restyle: bool,
    ) -> Result<()> {
        if restyle && !ws.set_frame_style(window, WindowFrame::BorderlessChild) {
            return Err(WallpaperError::Bind(
                "child window style change was rejected".to_string(),
            ));
        }
        if !ws.set_parent(window, Some(worker)) {
            if restyle && !ws.set_frame_style(window, WindowFrame::TopLevel) {
                warn!(
                    "[BACKDROP][BIND] style rollback for {:?} also rejected",
                    window
                );
            }
            return Err(WallpaperError::Bind(
                "reparenting into the worker surface was rejected".to_string(),
            ));
        }
        if !ws.position_window(window, rect, ZPlacement::Bottom) {
            return Err(WallpaperError::Bind(
                "repositioning over the monitor was rejected".to_string(),
            ));
        }
        info!(
            "[BACKDROP][BIND] window {:?} bound under worker {:?} at {:?}",
            window, worker, rect
        );
        Ok(())
    }
}
