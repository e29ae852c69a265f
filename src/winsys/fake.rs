//! In-memory [`WindowSystem`] backend.
//!
//! Models just enough of the desktop window hierarchy to exercise the
//! locator, binder and controller: top-level windows in enumeration order,
//! parent/child relations, frame styles and z-placement. It records every
//! message, sleep and mutation so tests can assert on the exact handshake.

use std::cell::RefCell;
use std::time::Duration;

use super::{Rect, WindowFrame, WindowId, WindowSystem, ZPlacement};
use crate::shell::{PROGMAN_CLASS, SPAWN_WORKER_MSG, WORKERW_CLASS};

/// A message captured by [`FakeWindowSystem::sent_messages`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub target: WindowId,
    pub msg: u32,
    pub wparam: usize,
    pub lparam: isize,
    pub timeout_ms: u32,
}

#[derive(Debug, Clone)]
struct FakeWindow {
    id: WindowId,
    class: String,
    parent: Option<WindowId>,
    rect: Rect,
    frame: WindowFrame,
    placement: Option<ZPlacement>,
    refuse_restyle: bool,
    refuse_reparent: bool,
    refuse_position: bool,
}

#[derive(Default)]
struct State {
    next_id: isize,
    monitors: Vec<Rect>,
    windows: Vec<FakeWindow>,
    progman: Option<WindowId>,
    icon_host: Option<WindowId>,
    spawn_worker_on_message: bool,
    worker_pending: bool,
    messages: Vec<SentMessage>,
    sleeps: Vec<Duration>,
}

/// Single-threaded by construction, matching the subsystem's concurrency
/// model; interior mutability lets trait methods take `&self`.
#[derive(Default)]
pub struct FakeWindowSystem {
    state: RefCell<State>,
}

impl FakeWindowSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_monitor(&self, rect: Rect) {
        self.state.borrow_mut().monitors.push(rect);
    }

    /// Create a top-level window of the given class, as the application's
    /// render surface would be before any binding.
    pub fn create_window(&self, class: &str, rect: Rect) -> WindowId {
        self.state.borrow_mut().insert(class, None, rect)
    }

    /// Install the shell hierarchy with the worker surface already present:
    /// Progman, then a WorkerW hosting the desktop icon view, then the
    /// trailing WorkerW sibling used as the wallpaper mount point.
    pub fn install_shell(&self) -> WindowId {
        self.install_shell_without_worker();
        self.state.borrow_mut().spawn_worker()
    }

    /// Install Progman and the icon-view host only; no worker sibling exists
    /// until [`spawn_worker_on_message`](Self::spawn_worker_on_message) is
    /// armed and the spawn handshake runs.
    pub fn install_shell_without_worker(&self) {
        let mut state = self.state.borrow_mut();
        let progman = state.insert(PROGMAN_CLASS, None, Rect::default());
        let host = state.insert(WORKERW_CLASS, None, Rect::default());
        state.insert(crate::shell::DEFVIEW_CLASS, Some(host), Rect::default());
        state.progman = Some(progman);
        state.icon_host = Some(host);
    }

    /// Arm deferred worker creation: the spawn message schedules the worker,
    /// and it materializes on the next sleep, the way the real shell creates
    /// it asynchronously on its own thread.
    pub fn spawn_worker_on_message(&self) {
        self.state.borrow_mut().spawn_worker_on_message = true;
    }

    /// Tear down the current worker sibling and create a fresh one with a new
    /// id, as the shell may do between binding sessions.
    pub fn recreate_worker(&self) -> WindowId {
        let mut state = self.state.borrow_mut();
        if let Some(host) = state.icon_host {
            if let Some(pos) = state
                .windows
                .iter()
                .position(|w| w.parent.is_none() && w.class == WORKERW_CLASS && w.id != host)
            {
                state.windows.remove(pos);
            }
        }
        state.spawn_worker()
    }

    pub fn refuse_restyle(&self, window: WindowId) {
        self.with_window(window, |w| w.refuse_restyle = true);
    }

    pub fn refuse_reparent(&self, window: WindowId) {
        self.with_window(window, |w| w.refuse_reparent = true);
    }

    pub fn refuse_position(&self, window: WindowId) {
        self.with_window(window, |w| w.refuse_position = true);
    }

    pub fn frame_of(&self, window: WindowId) -> WindowFrame {
        self.state
            .borrow()
            .find(window)
            .map(|w| w.frame)
            .unwrap_or(WindowFrame::TopLevel)
    }

    pub fn parent_of(&self, window: WindowId) -> Option<WindowId> {
        self.state.borrow().find(window).and_then(|w| w.parent)
    }

    pub fn rect_of(&self, window: WindowId) -> Rect {
        self.state
            .borrow()
            .find(window)
            .map(|w| w.rect)
            .unwrap_or_default()
    }

    pub fn placement_of(&self, window: WindowId) -> Option<ZPlacement> {
        self.state.borrow().find(window).and_then(|w| w.placement)
    }

    pub fn sent_messages(&self) -> Vec<SentMessage> {
        self.state.borrow().messages.clone()
    }

    pub fn sleep_count(&self) -> usize {
        self.state.borrow().sleeps.len()
    }

    fn with_window(&self, window: WindowId, f: impl FnOnce(&mut FakeWindow)) {
        let mut state = self.state.borrow_mut();
        if let Some(w) = state.find_mut(window) {
            f(w);
        }
    }
}

impl State {
    fn insert(&mut self, class: &str, parent: Option<WindowId>, rect: Rect) -> WindowId {
        self.next_id += 1;
        let id = WindowId(self.next_id);
        self.windows.push(FakeWindow {
            id,
            class: class.to_string(),
            parent,
            rect,
            frame: WindowFrame::TopLevel,
            placement: None,
            refuse_restyle: false,
            refuse_reparent: false,
            refuse_position: false,
        });
        id
    }

    fn spawn_worker(&mut self) -> WindowId {
        self.insert(WORKERW_CLASS, None, Rect::default())
    }

    fn find(&self, id: WindowId) -> Option<&FakeWindow> {
        self.windows.iter().find(|w| w.id == id)
    }

    fn find_mut(&mut self, id: WindowId) -> Option<&mut FakeWindow> {
        self.windows.iter_mut().find(|w| w.id == id)
    }
}

impl WindowSystem for FakeWindowSystem {
    fn monitor_rects(&self) -> Vec<Rect> {
        self.state.borrow().monitors.clone()
    }

    fn find_window(&self, class: &str) -> Option<WindowId> {
        self.state
            .borrow()
            .windows
            .iter()
            .find(|w| w.parent.is_none() && w.class == class)
            .map(|w| w.id)
    }

    fn find_window_after(&self, prev: WindowId, class: &str) -> Option<WindowId> {
        let state = self.state.borrow();
        let start = state.windows.iter().position(|w| w.id == prev)?;
        state.windows[start + 1..]
            .iter()
            .find(|w| w.parent.is_none() && w.class == class)
            .map(|w| w.id)
    }

    fn find_child(&self, parent: WindowId, class: &str) -> Option<WindowId> {
        self.state
            .borrow()
            .windows
            .iter()
            .find(|w| w.parent == Some(parent) && w.class == class)
            .map(|w| w.id)
    }

    fn top_level_windows(&self) -> Vec<WindowId> {
        self.state
            .borrow()
            .windows
            .iter()
            .filter(|w| w.parent.is_none())
            .map(|w| w.id)
            .collect()
    }

    fn send_message_timeout(
        &self,
        target: WindowId,
        msg: u32,
        wparam: usize,
        lparam: isize,
        timeout_ms: u32,
    ) {
        let mut state = self.state.borrow_mut();
        state.messages.push(SentMessage {
            target,
            msg,
            wparam,
            lparam,
            timeout_ms,
        });
        if state.spawn_worker_on_message && msg == SPAWN_WORKER_MSG && Some(target) == state.progman
        {
            state.worker_pending = true;
        }
    }

    fn parent(&self, window: WindowId) -> Option<WindowId> {
        self.state.borrow().find(window).and_then(|w| w.parent)
    }

    fn set_frame_style(&self, window: WindowId, frame: WindowFrame) -> bool {
        let mut state = self.state.borrow_mut();
        match state.find_mut(window) {
            Some(w) if !w.refuse_restyle => {
                w.frame = frame;
                true
            }
            _ => false,
        }
    }

    fn set_parent(&self, window: WindowId, parent: Option<WindowId>) -> bool {
        let mut state = self.state.borrow_mut();
        if let Some(new_parent) = parent {
            if state.find(new_parent).is_none() {
                return false;
            }
        }
        match state.find_mut(window) {
            Some(w) if !w.refuse_reparent => {
                w.parent = parent;
                true
            }
            _ => false,
        }
    }

    fn position_window(&self, window: WindowId, rect: Rect, placement: ZPlacement) -> bool {
        let mut state = self.state.borrow_mut();
        match state.find_mut(window) {
            Some(w) if !w.refuse_position => {
                w.rect = rect;
                w.placement = Some(placement);
                true
            }
            _ => false,
        }
    }

    fn sleep(&self, duration: Duration) {
        let mut state = self.state.borrow_mut();
        state.sleeps.push(duration);
        if state.worker_pending {
            state.worker_pending = false;
            state.spawn_worker();
        }
    }
}
