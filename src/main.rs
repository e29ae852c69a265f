#![cfg_attr(windows, windows_subsystem = "windows")]

//! Demo shell: a borderless window with a GDI-rendered circle scene that can
//! be toggled onto the desktop background behind the icons.

#[cfg(windows)]
mod app {
    use std::{
        path::PathBuf,
        thread,
        time::{Duration, Instant},
    };

    use windows::{
        core::{w, PCWSTR},
        Win32::{
            Foundation::{COLORREF, HINSTANCE, HWND, LPARAM, LRESULT, RECT, WPARAM},
            Graphics::Gdi::{
                BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, CreateSolidBrush, DeleteDC,
                DeleteObject, Ellipse, FillRect, GetDC, ReleaseDC, SelectObject, SetBkMode,
                SetTextColor, TextOutW, HBITMAP, HDC, SRCCOPY, TRANSPARENT,
            },
            System::LibraryLoader::GetModuleHandleW,
            UI::HiDpi::{
                SetProcessDpiAwarenessContext, DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2,
            },
            UI::Input::KeyboardAndMouse::{GetAsyncKeyState, VK_LEFT, VK_RIGHT},
            UI::WindowsAndMessaging::{
                CreateWindowExW, DefWindowProcW, DispatchMessageW, GetClientRect, LoadCursorW,
                PeekMessageW, PostQuitMessage, RegisterClassW, TranslateMessage, IDC_ARROW, MSG,
                PM_REMOVE, WINDOW_EX_STYLE, WM_DESTROY, WM_QUIT, WNDCLASSW, WS_POPUP, WS_VISIBLE,
            },
        },
    };

    use backdrop::{
        binder::WallpaperBinder,
        config::AppConfig,
        controller::{Mode, ModeController},
        error, info, logging,
        scene::Scene,
        util::to_wstring,
        warn,
        winsys::{win32::Win32WindowSystem, Rect, WindowId, WindowSystem},
    };

    const HOST_CLASS_NAME: PCWSTR = w!("BackdropHostWindow");
    const VK_W: i32 = 0x57;
    const VK_A: i32 = 0x41;
    const VK_D: i32 = 0x44;

    pub fn run() -> windows::core::Result<()> {
        let config = AppConfig::load(&config_path()).unwrap_or_default();
        logging::init(config.debug, &config.log_level);
        std::panic::set_hook(Box::new(|panic_info| {
            error!("[BACKDROP] panic: {panic_info}");
        }));
        info!("[BACKDROP] starting");

        unsafe {
            if SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2).is_err() {
                warn!("[BACKDROP] per-monitor DPI awareness unavailable; monitor rects may be scaled");
            }
        }

        let windowed = Rect::new(
            config.windowed.x,
            config.windowed.y,
            config.windowed.x + config.windowed.width,
            config.windowed.y + config.windowed.height,
        );
        let hwnd = create_host_window(windowed)?;
        let window = WindowId(hwnd.0 as isize);

        let ws = Win32WindowSystem::new();
        let mut controller =
            ModeController::new(WallpaperBinder::new(config.locator.clone(), windowed));

        if config.wallpaper_on_start {
            if let Err(e) = controller.toggle(&ws, window) {
                warn!("[BACKDROP] initial wallpaper bind failed, staying windowed: {e}");
            }
        }

        let mut scene = Scene::new(windowed.width(), windowed.height());
        let mut buffer: Option<BackBuffer> = None;
        let mut keys = KeyLatch::default();
        let mut last_frame = Instant::now();
        let tick = Duration::from_millis(config.tick_sleep_ms.max(1));

        loop {
            unsafe {
                let mut msg = MSG::default();
                while PeekMessageW(&mut msg, None, 0, 0, PM_REMOVE).as_bool() {
                    if msg.message == WM_QUIT {
                        shutdown(&ws, &mut controller, window);
                        return Ok(());
                    }
                    let _ = TranslateMessage(&msg);
                    DispatchMessageW(&msg);
                }
            }

            handle_keys(&ws, &mut controller, window, &mut keys);

            let (width, height) = client_size(hwnd);
            if buffer
                .as_ref()
                .map(|b| b.width != width || b.height != height)
                .unwrap_or(true)
            {
                buffer = BackBuffer::new(hwnd, width, height);
                scene.resize(width, height);
            }

            let now = Instant::now();
            let dt = now.duration_since(last_frame).as_secs_f32().min(0.1);
            last_frame = now;
            scene.step(dt);

            if let Some(buffer) = buffer.as_ref() {
                draw_frame(hwnd, buffer, &scene, &controller);
            }

            thread::sleep(tick);
        }
    }

    fn config_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("backdrop.yaml")))
            .unwrap_or_else(|| PathBuf::from("backdrop.yaml"))
    }

    fn shutdown(ws: &dyn WindowSystem, controller: &mut ModeController, window: WindowId) {
        // Never leave the window parented into the shell's worker surface.
        if controller.mode() == Mode::Wallpaper {
            if let Err(e) = controller.toggle(ws, window) {
                warn!("[BACKDROP] unbind on shutdown failed: {e}");
            }
        }
        info!("[BACKDROP] exiting");
    }

    #[derive(Default)]
    struct KeyLatch {
        toggle: bool,
        next: bool,
        previous: bool,
    }

    fn key_down(vk: i32) -> bool {
        unsafe { (GetAsyncKeyState(vk) as u16 & 0x8000) != 0 }
    }

    fn edge(down: bool, latch: &mut bool) -> bool {
        let fired = down && !*latch;
        *latch = down;
        fired
    }

    fn handle_keys(
        ws: &dyn WindowSystem,
        controller: &mut ModeController,
        window: WindowId,
        keys: &mut KeyLatch,
    ) {
        if edge(key_down(VK_W), &mut keys.toggle) {
            match controller.toggle(ws, window) {
                Ok(mode) => info!("[BACKDROP] toggled to {mode:?}"),
                Err(e) => warn!("[BACKDROP] toggle failed: {e}"),
            }
        }

        let next = key_down(VK_RIGHT.0 as i32) || key_down(VK_D);
        let previous = key_down(VK_LEFT.0 as i32) || key_down(VK_A);

        // Monitor keys only act while wallpaper mode is engaged.
        if controller.mode() == Mode::Wallpaper {
            if edge(next, &mut keys.next) {
                if let Err(e) = controller.next_monitor(ws, window) {
                    warn!("[BACKDROP] next monitor failed: {e}");
                }
            }
            if edge(previous, &mut keys.previous) {
                if let Err(e) = controller.previous_monitor(ws, window) {
                    warn!("[BACKDROP] previous monitor failed: {e}");
                }
            }
        } else {
            keys.next = next;
            keys.previous = previous;
        }
    }

    fn create_host_window(rect: Rect) -> windows::core::Result<HWND> {
        let hinstance = unsafe { GetModuleHandleW(None).map(|h| HINSTANCE(h.0))? };

        let wc = WNDCLASSW {
            lpfnWndProc: Some(host_window_proc),
            hInstance: hinstance,
            lpszClassName: HOST_CLASS_NAME,
            hCursor: unsafe { LoadCursorW(None, IDC_ARROW)? },
            ..Default::default()
        };
        unsafe {
            let _ = RegisterClassW(&wc);
        }

        unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE(0),
                HOST_CLASS_NAME,
                w!("Backdrop"),
                WS_POPUP | WS_VISIBLE,
                rect.left,
                rect.top,
                rect.width(),
                rect.height(),
                None,
                None,
                Some(hinstance),
                None,
            )
        }
    }

    unsafe extern "system" fn host_window_proc(
        hwnd: HWND,
        msg: u32,
        wparam: WPARAM,
        lparam: LPARAM,
    ) -> LRESULT {
        if msg == WM_DESTROY {
            PostQuitMessage(0);
            return LRESULT(0);
        }
        DefWindowProcW(hwnd, msg, wparam, lparam)
    }

    fn client_size(hwnd: HWND) -> (i32, i32) {
        let mut rect = RECT::default();
        unsafe {
            let _ = GetClientRect(hwnd, &mut rect);
        }
        (
            (rect.right - rect.left).max(1),
            (rect.bottom - rect.top).max(1),
        )
    }

    struct BackBuffer {
        dc: HDC,
        bitmap: HBITMAP,
        width: i32,
        height: i32,
    }

    impl BackBuffer {
        fn new(hwnd: HWND, width: i32, height: i32) -> Option<Self> {
            unsafe {
                let window_dc = GetDC(Some(hwnd));
                if window_dc.is_invalid() {
                    return None;
                }
                let dc = CreateCompatibleDC(Some(window_dc));
                let bitmap = CreateCompatibleBitmap(window_dc, width, height);
                ReleaseDC(Some(hwnd), window_dc);
                if dc.is_invalid() || bitmap.is_invalid() {
                    return None;
                }
                SelectObject(dc, bitmap.into());
                Some(Self {
                    dc,
                    bitmap,
                    width,
                    height,
                })
            }
        }
    }

    impl Drop for BackBuffer {
        fn drop(&mut self) {
            unsafe {
                let _ = DeleteObject(self.bitmap.into());
                let _ = DeleteDC(self.dc);
            }
        }
    }

    fn rgb(r: u8, g: u8, b: u8) -> COLORREF {
        COLORREF(r as u32 | (g as u32) << 8 | (b as u32) << 16)
    }

    fn draw_frame(hwnd: HWND, buffer: &BackBuffer, scene: &Scene, controller: &ModeController) {
        unsafe {
            let full = RECT {
                left: 0,
                top: 0,
                right: buffer.width,
                bottom: buffer.height,
            };
            let background = CreateSolidBrush(rgb(18, 22, 33));
            FillRect(buffer.dc, &full, background);
            let _ = DeleteObject(background.into());

            for circle in &scene.circles {
                let (r, g, b) = circle.color;
                let brush = CreateSolidBrush(rgb(r, g, b));
                let old = SelectObject(buffer.dc, brush.into());
                let _ = Ellipse(
                    buffer.dc,
                    (circle.x - circle.radius) as i32,
                    (circle.y - circle.radius) as i32,
                    (circle.x + circle.radius) as i32,
                    (circle.y + circle.radius) as i32,
                );
                SelectObject(buffer.dc, old);
                let _ = DeleteObject(brush.into());
            }

            let status = controller.status();
            let line = match status.mode {
                Mode::Wallpaper => format!(
                    "Wallpaper Mode - [W] toggles, arrows switch monitor {}/{}",
                    status.monitor_index + 1,
                    status.monitor_count
                ),
                Mode::Windowed => "Window Mode - [W] toggles wallpaper".to_string(),
            };
            let mut wide = to_wstring(&line);
            wide.pop(); // TextOutW takes an unterminated slice
            SetBkMode(buffer.dc, TRANSPARENT);
            SetTextColor(buffer.dc, rgb(220, 224, 232));
            let _ = TextOutW(buffer.dc, 10, 10, &wide);

            let window_dc = GetDC(Some(hwnd));
            if !window_dc.is_invalid() {
                let _ = BitBlt(
                    window_dc,
                    0,
                    0,
                    buffer.width,
                    buffer.height,
                    Some(buffer.dc),
                    0,
                    0,
                    SRCCOPY,
                );
                ReleaseDC(Some(hwnd), window_dc);
            }
        }
    }
}

#[cfg(windows)]
fn main() -> windows::core::Result<()> {
    app::run()
}

#[cfg(not(windows))]
fn main() {
    eprintln!("backdrop integrates with the Windows desktop shell; there is no worker surface to bind on this platform");
}
