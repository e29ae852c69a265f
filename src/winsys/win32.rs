//! Real Win32 backend for [`WindowSystem`].
//!
//! All `unsafe` OS interop for the integration subsystem lives here; the
//! algorithms above only ever see the trait.

use std::{mem, thread, time::Duration};

use windows::{
    core::{BOOL, PCWSTR},
    Win32::{
        Foundation::{GetLastError, SetLastError, HWND, LPARAM, RECT, WIN32_ERROR, WPARAM},
        Graphics::Gdi::{EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITORINFO},
        UI::WindowsAndMessaging::{
            EnumWindows, FindWindowExW, FindWindowW, GetParent, GetWindowLongW,
            SendMessageTimeoutW, SetParent, SetWindowLongW, SetWindowPos, GWL_STYLE, HWND_BOTTOM,
            HWND_TOP, SMTO_NORMAL, SWP_SHOWWINDOW, WS_CHILD, WS_POPUP, WS_VISIBLE,
        },
    },
};

use super::{Rect, WindowFrame, WindowId, WindowSystem, ZPlacement};
use crate::util::to_wstring;

pub struct Win32WindowSystem;

impl Win32WindowSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Win32WindowSystem {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn hwnd_of(id: WindowId) -> HWND {
    HWND(id.0 as *mut core::ffi::c_void)
}

pub(crate) fn id_of(hwnd: HWND) -> WindowId {
    WindowId(hwnd.0 as isize)
}

fn from_rect(rect: RECT) -> Rect {
    Rect {
        left: rect.left,
        top: rect.top,
        right: rect.right,
        bottom: rect.bottom,
    }
}

impl WindowSystem for Win32WindowSystem {
    fn monitor_rects(&self) -> Vec<Rect> {
        struct EnumState {
            rects: Vec<Rect>,
            failed: bool,
        }

        unsafe extern "system" fn enum_monitor_proc(
            monitor: HMONITOR,
            _hdc: HDC,
            _rect: *mut RECT,
            lparam: LPARAM,
        ) -> BOOL {
            let state = &mut *(lparam.0 as *mut EnumState);
            let mut info: MONITORINFO = mem::zeroed();
            info.cbSize = mem::size_of::<MONITORINFO>() as u32;

            if GetMonitorInfoW(monitor, &mut info).as_bool() {
                state.rects.push(from_rect(info.rcMonitor));
                BOOL(1)
            } else {
                // A single failed geometry query discards the whole pass.
                state.failed = true;
                BOOL(0)
            }
        }

        let mut state = EnumState {
            rects: Vec::new(),
            failed: false,
        };
        let ok = unsafe {
            EnumDisplayMonitors(
                None,
                None,
                Some(enum_monitor_proc),
                LPARAM((&mut state as *mut EnumState) as isize),
            )
        };

        if state.failed || (!ok.as_bool() && state.rects.is_empty()) {
            Vec::new()
        } else {
            state.rects
        }
    }

    fn find_window(&self, class: &str) -> Option<WindowId> {
        let class = to_wstring(class);
        unsafe { FindWindowW(PCWSTR(class.as_ptr()), None).ok().map(id_of) }
    }

    fn find_window_after(&self, prev: WindowId, class: &str) -> Option<WindowId> {
        let class = to_wstring(class);
        unsafe {
            FindWindowExW(None, Some(hwnd_of(prev)), PCWSTR(class.as_ptr()), None)
                .ok()
                .map(id_of)
        }
    }

    fn find_child(&self, parent: WindowId, class: &str) -> Option<WindowId> {
        let class = to_wstring(class);
        unsafe {
            FindWindowExW(Some(hwnd_of(parent)), None, PCWSTR(class.as_ptr()), None)
                .ok()
                .map(id_of)
        }
    }

    fn top_level_windows(&self) -> Vec<WindowId> {
        unsafe extern "system" fn enum_proc(hwnd: HWND, lparam: LPARAM) -> BOOL {
            let out = &mut *(lparam.0 as *mut Vec<WindowId>);
            out.push(id_of(hwnd));
            BOOL(1)
        }

        let mut windows = Vec::<WindowId>::new();
        unsafe {
            let _ = EnumWindows(
                Some(enum_proc),
                LPARAM((&mut windows as *mut Vec<WindowId>) as isize),
            );
        }
        windows
    }

    fn send_message_timeout(
        &self,
        target: WindowId,
        msg: u32,
        wparam: usize,
        lparam: isize,
        timeout_ms: u32,
    ) {
        // The shell gives no meaningful reply; only the side effect matters.
        let mut result = 0usize;
        unsafe {
            let _ = SendMessageTimeoutW(
                hwnd_of(target),
                msg,
                WPARAM(wparam),
                LPARAM(lparam),
                SMTO_NORMAL,
                timeout_ms,
                Some(&mut result),
            );
        }
    }

    fn parent(&self, window: WindowId) -> Option<WindowId> {
        unsafe {
            GetParent(hwnd_of(window))
                .ok()
                .filter(|h| !h.is_invalid())
                .map(id_of)
        }
    }

    fn set_frame_style(&self, window: WindowId, frame: WindowFrame) -> bool {
        let style = match frame {
            WindowFrame::BorderlessChild => WS_VISIBLE | WS_POPUP | WS_CHILD,
            WindowFrame::TopLevel => WS_VISIBLE | WS_POPUP,
        };
        unsafe {
            // SetWindowLongW reports failure through GetLastError when the
            // previous value was legitimately zero.
            SetLastError(WIN32_ERROR(0));
            let previous = SetWindowLongW(hwnd_of(window), GWL_STYLE, style.0 as i32);
            if previous == 0 && GetLastError().0 != 0 {
                return false;
            }
            GetWindowLongW(hwnd_of(window), GWL_STYLE) as u32 & style.0 == style.0
        }
    }

    fn set_parent(&self, window: WindowId, parent: Option<WindowId>) -> bool {
        unsafe { SetParent(hwnd_of(window), parent.map(hwnd_of)).is_ok() }
    }

    fn position_window(&self, window: WindowId, rect: Rect, placement: ZPlacement) -> bool {
        let insert_after = match placement {
            ZPlacement::Bottom => HWND_BOTTOM,
            ZPlacement::Top => HWND_TOP,
        };
        unsafe {
            SetWindowPos(
                hwnd_of(window),
                Some(insert_after),
                rect.left,
                rect.top,
                rect.width(),
                rect.height(),
                SWP_SHOWWINDOW,
            )
            .is_ok()
        }
    }

    fn sleep(&self, duration: Duration) {
        thread::sleep(duration);
    }
}
