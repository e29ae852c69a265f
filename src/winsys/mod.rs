//! Window-system capability boundary.
//!
//! Every OS query the integration subsystem needs is funnelled through the
//! [`WindowSystem`] trait: the real Win32 backend lives in [`win32`], an
//! in-memory one for tests in [`fake`]. The locator and registry algorithms
//! only ever see this trait.

use std::time::Duration;

pub mod fake;
#[cfg(windows)]
pub mod win32;

/// Opaque reference to a window owned by the window system.
///
/// The subsystem never creates or destroys windows through this id; in
/// particular the worker surface belongs to the shell process and is held
/// strictly non-owning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub isize);

/// Rectangle in virtual-screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    /// Bounding box of two rectangles.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }
}

/// Frame styling applied to the render-surface window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowFrame {
    /// Borderless child window, suitable for parenting into the worker
    /// surface (`WS_VISIBLE | WS_POPUP | WS_CHILD`).
    BorderlessChild,
    /// Normal top-level popup window (`WS_VISIBLE | WS_POPUP`).
    TopLevel,
}

/// Where a repositioned window lands in the z-order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZPlacement {
    /// Bottom of the sibling z-order; wallpaper panes must never sit above
    /// other desktop chrome.
    Bottom,
    /// Top of the normal (non-topmost) z-order.
    Top,
}

/// The window-system queries the integration subsystem consumes.
///
/// Mutating calls return `false` when the OS rejects them; the caller decides
/// how that surfaces. All methods are synchronous and expected to be called
/// from a single thread.
pub trait WindowSystem {
    /// Bounding rectangles of all displays, in enumeration order.
    ///
    /// Returns an empty vector when enumeration fails outright or any
    /// per-monitor geometry query fails; partial results are discarded, never
    /// exposed.
    fn monitor_rects(&self) -> Vec<Rect>;

    /// First top-level window of the given class.
    fn find_window(&self, class: &str) -> Option<WindowId>;

    /// First top-level window of the given class enumerated after `prev`.
    fn find_window_after(&self, prev: WindowId, class: &str) -> Option<WindowId>;

    /// First direct child of `parent` with the given class.
    fn find_child(&self, parent: WindowId, class: &str) -> Option<WindowId>;

    /// All top-level windows in z/enumeration order.
    fn top_level_windows(&self) -> Vec<WindowId>;

    /// Send a message with a bounded timeout, discarding any reply.
    fn send_message_timeout(
        &self,
        target: WindowId,
        msg: u32,
        wparam: usize,
        lparam: isize,
        timeout_ms: u32,
    );

    /// Parent of `window`, if it has one.
    fn parent(&self, window: WindowId) -> Option<WindowId>;

    /// Swap the window's frame style. Returns `false` if the OS rejected the
    /// style change.
    fn set_frame_style(&self, window: WindowId, frame: WindowFrame) -> bool;

    /// Reparent `window` under `parent`, or detach it (`None`).
    fn set_parent(&self, window: WindowId, parent: Option<WindowId>) -> bool;

    /// Move/resize `window` to `rect` and place it in the z-order.
    fn position_window(&self, window: WindowId, rect: Rect, placement: ZPlacement) -> bool;

    /// Block the calling thread. Routed through the trait so tests observe
    /// the locator's settle polling instead of actually sleeping.
    fn sleep(&self, duration: Duration);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_dimensions() {
        let r = Rect::new(-1920, 0, 3840, 1080);
        assert_eq!(r.width(), 5760);
        assert_eq!(r.height(), 1080);
    }

    #[test]
    fn rect_contains_is_half_open() {
        let r = Rect::new(0, 0, 1920, 1080);
        assert!(r.contains(0, 0));
        assert!(r.contains(1919, 1079));
        assert!(!r.contains(1920, 540));
        assert!(!r.contains(960, 1080));
    }

    #[test]
    fn rect_union_covers_both() {
        let a = Rect::new(0, 0, 1920, 1080);
        let b = Rect::new(-1920, 0, 0, 1080);
        assert_eq!(a.union(&b), Rect::new(-1920, 0, 1920, 1080));
    }
}
