//! Window icon loading

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::warn;
use windows::core::HSTRING;
use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    LoadImageW, SendMessageW, HICON, IMAGE_ICON, LR_DEFAULTSIZE, LR_LOADFROMFILE, WM_SETICON,
};

/// Icon file shipped next to the executable
const ICON_FILE: &str = "app_icon.ico";

const ICON_SMALL: usize = 0;
const ICON_BIG: usize = 1;

/// Get asset path relative to executable
///
/// Searches in order:
/// 1. Executable directory
/// 2. Current working directory (development)
fn asset_path(relative_path: &str) -> Result<PathBuf> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let path = exe_dir.join(relative_path);
            if path.exists() {
                return Ok(path);
            }
        }
    }

    let cwd_path = std::env::current_dir()
        .context("Failed to get current directory")?
        .join(relative_path);

    if cwd_path.exists() {
        return Ok(cwd_path);
    }

    anyhow::bail!(
        "Asset not found: {} (searched in exe dir and current dir)",
        relative_path
    )
}

fn load_icon() -> Result<HICON> {
    let path = asset_path(ICON_FILE)?;
    let handle = unsafe {
        LoadImageW(
            None,
            &HSTRING::from(path.as_path()),
            IMAGE_ICON,
            0,
            0,
            LR_LOADFROMFILE | LR_DEFAULTSIZE,
        )
    }
    .with_context(|| format!("Failed to load icon: {:?}", path))?;

    Ok(HICON(handle.0))
}

/// Set the application icon on `hwnd`; a missing icon only logs
pub fn apply_app_icon(hwnd: HWND) {
    match load_icon() {
        Ok(icon) => unsafe {
            let icon = LPARAM(icon.0 as isize);
            SendMessageW(hwnd, WM_SETICON, WPARAM(ICON_BIG), icon);
            SendMessageW(hwnd, WM_SETICON, WPARAM(ICON_SMALL), icon);
        },
        Err(e) => warn!("{:#}", e),
    }
}
