//! Child control creation and access

use std::ffi::c_void;
use tracing::warn;
use windows::Win32::Foundation::{BOOL, HINSTANCE, HWND, LPARAM, WPARAM};
use windows::Win32::Graphics::Gdi::{GetStockObject, DEFAULT_GUI_FONT};
use windows::Win32::UI::Input::KeyboardAndMouse::EnableWindow;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, GetWindowTextLengthW, GetWindowTextW, SendMessageW, SetWindowTextW, HMENU,
    WINDOW_EX_STYLE, WINDOW_STYLE, WM_SETFONT, WM_USER, WS_CHILD, WS_EX_CLIENTEDGE, WS_TABSTOP,
    WS_VISIBLE,
};
use windows_core::{w, HSTRING, PCWSTR};

pub const ID_PATH_EDIT: u16 = 101;
pub const ID_BROWSE: u16 = 102;
pub const ID_NAME_EDIT: u16 = 103;
pub const ID_INSTALL: u16 = 104;
pub const ID_PROGRESS: u16 = 105;
pub const ID_MESSAGE: u16 = 106;

const ES_AUTOHSCROLL: u32 = 0x0080;
const SS_LEFT: u32 = 0x0000;
const SS_CENTER: u32 = 0x0001;
const BS_PUSHBUTTON: u32 = 0x0000;
const BS_DEFPUSHBUTTON: u32 = 0x0001;

const PBM_SETPOS: u32 = WM_USER + 2;
const PBM_SETRANGE32: u32 = WM_USER + 6;

/// Indeterminate animation: position sweep and step per tick
pub const PROGRESS_RANGE: usize = 100;
const PROGRESS_STEP: usize = 4;

/// Pixel rectangle of a control inside the client area
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Handles of the widgets the form reads or updates
#[derive(Debug, Default, Clone, Copy)]
pub struct Controls {
    pub path_edit: HWND,
    pub name_edit: HWND,
    pub install_button: HWND,
    pub progress: HWND,
    pub message: HWND,
}

/// Creates children of one parent window with a shared font
pub struct ControlFactory {
    parent: HWND,
    instance: HINSTANCE,
}

impl ControlFactory {
    pub fn new(parent: HWND, instance: HINSTANCE) -> Self {
        Self { parent, instance }
    }

    pub fn label(&self, text: &str, bounds: Bounds) -> windows::core::Result<HWND> {
        self.create(w!("STATIC"), text, WINDOW_STYLE(SS_LEFT), WINDOW_EX_STYLE(0), bounds, 0)
    }

    pub fn centered_label(&self, text: &str, bounds: Bounds) -> windows::core::Result<HWND> {
        self.create(w!("STATIC"), text, WINDOW_STYLE(SS_CENTER), WINDOW_EX_STYLE(0), bounds, 0)
    }

    /// Multi-line static area; word wrapping is implicit for `SS_LEFT`
    pub fn message_area(&self, bounds: Bounds) -> windows::core::Result<HWND> {
        self.create(
            w!("STATIC"),
            "",
            WINDOW_STYLE(SS_LEFT),
            WINDOW_EX_STYLE(0),
            bounds,
            ID_MESSAGE,
        )
    }

    pub fn edit(&self, text: &str, bounds: Bounds, id: u16) -> windows::core::Result<HWND> {
        self.create(
            w!("EDIT"),
            text,
            WS_TABSTOP | WINDOW_STYLE(ES_AUTOHSCROLL),
            WS_EX_CLIENTEDGE,
            bounds,
            id,
        )
    }

    pub fn button(
        &self,
        text: &str,
        bounds: Bounds,
        id: u16,
        default: bool,
    ) -> windows::core::Result<HWND> {
        let kind = if default {
            BS_DEFPUSHBUTTON
        } else {
            BS_PUSHBUTTON
        };
        self.create(
            w!("BUTTON"),
            text,
            WS_TABSTOP | WINDOW_STYLE(kind),
            WINDOW_EX_STYLE(0),
            bounds,
            id,
        )
    }

    pub fn progress_bar(&self, bounds: Bounds) -> windows::core::Result<HWND> {
        let hwnd = self.create(
            w!("msctls_progress32"),
            "",
            WINDOW_STYLE(0),
            WINDOW_EX_STYLE(0),
            bounds,
            ID_PROGRESS,
        )?;
        unsafe {
            SendMessageW(
                hwnd,
                PBM_SETRANGE32,
                WPARAM(0),
                LPARAM(PROGRESS_RANGE as isize),
            );
        }
        Ok(hwnd)
    }

    fn create(
        &self,
        class: PCWSTR,
        text: &str,
        style: WINDOW_STYLE,
        ex_style: WINDOW_EX_STYLE,
        bounds: Bounds,
        id: u16,
    ) -> windows::core::Result<HWND> {
        let hwnd = unsafe {
            CreateWindowExW(
                ex_style,
                class,
                &HSTRING::from(text),
                WS_CHILD | WS_VISIBLE | style,
                bounds.x,
                bounds.y,
                bounds.width,
                bounds.height,
                self.parent,
                HMENU(id as usize as *mut c_void),
                self.instance,
                None,
            )?
        };

        unsafe {
            let font = GetStockObject(DEFAULT_GUI_FONT);
            SendMessageW(hwnd, WM_SETFONT, WPARAM(font.0 as usize), LPARAM(1));
        }

        Ok(hwnd)
    }
}

/// Current text of a control
pub fn text(hwnd: HWND) -> String {
    unsafe {
        let len = GetWindowTextLengthW(hwnd);
        if len <= 0 {
            return String::new();
        }

        let mut buf = vec![0u16; len as usize + 1];
        let copied = GetWindowTextW(hwnd, &mut buf).max(0) as usize;
        String::from_utf16_lossy(&buf[..copied])
    }
}

/// Replace the text of a control
pub fn set_text(hwnd: HWND, value: &str) {
    if let Err(e) = unsafe { SetWindowTextW(hwnd, &HSTRING::from(value)) } {
        warn!("Failed to set control text: {}", e);
    }
}

pub fn set_enabled(hwnd: HWND, enabled: bool) {
    unsafe {
        let _ = EnableWindow(hwnd, BOOL::from(enabled));
    }
}

/// Move the progress bar to `position` within `0..PROGRESS_RANGE`
pub fn set_progress(hwnd: HWND, position: usize) {
    unsafe {
        SendMessageW(hwnd, PBM_SETPOS, WPARAM(position), LPARAM(0));
    }
}

/// Next position of the indeterminate sweep
pub fn next_progress(position: usize) -> usize {
    (position + PROGRESS_STEP) % (PROGRESS_RANGE + PROGRESS_STEP)
}
