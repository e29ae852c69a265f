use thiserror::Error;

/// Failures surfaced by the wallpaper integration subsystem.
///
/// Everything here is reported to the caller and nothing is fatal: the
/// application can keep running in windowed mode indefinitely if binding
/// never succeeds.
#[derive(Debug, Error)]
pub enum WallpaperError {
    /// Monitor enumeration failed or reported zero monitors.
    #[error("monitor enumeration failed: {0}")]
    Enumeration(String),

    /// A monitor selection was outside `[0, count)`.
    #[error("monitor index {index} out of range for {count} monitor(s)")]
    InvalidIndex { index: usize, count: usize },

    /// An operation needed monitor geometry before it was ever enumerated.
    #[error("monitor layout has not been enumerated")]
    NotInitialized,

    /// The shell's program manager window ("Progman") is missing.
    #[error("shell program manager window not found")]
    ShellNotFound,

    /// The worker-surface handshake ran but no usable WorkerW sibling
    /// appeared behind the desktop icon view.
    #[error("no worker surface found behind the desktop icon view")]
    WorkerSurfaceNotFound,

    /// An OS-level restyle/reparent/reposition call was rejected.
    #[error("wallpaper binding failed: {0}")]
    Bind(String),
}

pub type Result<T> = std::result::Result<T, WallpaperError>;
