//! Wallpaper window integration for the Windows desktop shell.
//!
//! The library half of the crate is the part with actual engineering in it:
//! locating the shell's hidden `WorkerW` layer, reparenting a render-surface
//! window into it, tracking monitors and toggling between wallpaper and
//! windowed mode. All of it runs against the [`winsys::WindowSystem`]
//! capability trait, so the whole subsystem is exercised in tests through the
//! in-memory [`winsys::fake`] backend without a desktop session.

pub mod binder;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod monitors;
pub mod scene;
pub mod shell;
#[cfg(windows)]
pub mod util;
pub mod winsys;
