//! Monitor registry: display geometry plus the current selection.
//!
//! The full rectangle set is captured in one enumeration pass and held as a
//! value; there is no hot-plug handling, callers re-enumerate from scratch
//! when they want fresh geometry.

use crate::error::{Result, WallpaperError};
use crate::info;
use crate::winsys::{Rect, WindowSystem};

#[derive(Debug, Clone)]
pub struct MonitorLayout {
    rects: Vec<Rect>,
    current: usize,
}

impl MonitorLayout {
    /// Enumerate all displays and select the center-most one.
    ///
    /// Fails with [`WallpaperError::Enumeration`] when the window system
    /// reports no monitors or hands back degenerate geometry; a partial set
    /// is never exposed.
    pub fn enumerate(ws: &dyn WindowSystem) -> Result<Self> {
        let rects = ws.monitor_rects();
        if rects.is_empty() {
            return Err(WallpaperError::Enumeration(
                "window system reported zero monitors".to_string(),
            ));
        }
        if let Some(bad) = rects.iter().find(|r| r.width() <= 0 || r.height() <= 0) {
            return Err(WallpaperError::Enumeration(format!(
                "degenerate monitor rect {bad:?}"
            )));
        }

        let current = center_index(&rects);
        info!(
            "[BACKDROP][MONITORS] {} monitor(s), center selection is index {}",
            rects.len(),
            current
        );
        Ok(Self { rects, current })
    }

    pub fn count(&self) -> usize {
        self.rects.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_rect(&self) -> Rect {
        self.rects[self.current]
    }

    pub fn rect(&self, index: usize) -> Option<Rect> {
        self.rects.get(index).copied()
    }

    /// Commit a new selection, returning the previous index so callers can
    /// decide whether a rebind is needed.
    pub fn select(&mut self, index: usize) -> Result<usize> {
        if index >= self.rects.len() {
            return Err(WallpaperError::InvalidIndex {
                index,
                count: self.rects.len(),
            });
        }
        let previous = self.current;
        self.current = index;
        Ok(previous)
    }

    /// Wrap-around to the next monitor; unchanged when only one exists.
    pub fn next(&mut self) -> usize {
        if self.rects.len() > 1 {
            self.current = (self.current + 1) % self.rects.len();
        }
        self.current
    }

    /// Wrap-around to the previous monitor; unchanged when only one exists.
    pub fn previous(&mut self) -> usize {
        if self.rects.len() > 1 {
            self.current = (self.current + self.rects.len() - 1) % self.rects.len();
        }
        self.current
    }
}

/// Index of the monitor containing the midpoint of the virtual screen (the
/// union of all monitor rectangles). Falls back to 0 when the midpoint lands
/// on a seam between monitors.
fn center_index(rects: &[Rect]) -> usize {
    let mut bounds = rects[0];
    for rect in &rects[1..] {
        bounds = bounds.union(rect);
    }
    let cx = bounds.left + bounds.width() / 2;
    let cy = bounds.top + bounds.height() / 2;

    rects
        .iter()
        .position(|r| r.contains(cx, cy))
        .unwrap_or(0)
}
