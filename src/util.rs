use std::{ffi::OsStr, os::windows::ffi::OsStrExt};

/// Null-terminated UTF-16 buffer for Win32 string parameters. The buffer must
/// outlive any `PCWSTR` built from it.
pub fn to_wstring(s: &str) -> Vec<u16> {
    OsStr::new(s)
        .encode_wide()
        .chain(std::iter::once(0))
        .collect()
}
