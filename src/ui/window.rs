//! Installer main window
//!
//! The window owns the [`RegistrationForm`] and the [`InstallWorker`]; a
//! pointer to the boxed `FormWindow` lives in the window's user data and the
//! window procedure forwards messages to it.

use crate::error::Result;
use crate::form::{InstallWorker, Progress, RegistrationForm, Severity};
use crate::service::CommandRunner;
use crate::ui::controls::{self, Bounds, ControlFactory, Controls};
use crate::ui::dialog::FolderDialog;
use crate::ui::icon;
use std::ffi::c_void;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use windows::core::{w, HSTRING};
use windows::Win32::Foundation::{COLORREF, HINSTANCE, HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::Graphics::Gdi::{
    CreateSolidBrush, DeleteObject, SetBkColor, SetTextColor, HBRUSH, HDC,
};
use windows::Win32::System::Com::{CoInitializeEx, CoUninitialize, COINIT_APARTMENTTHREADED};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::Controls::{InitCommonControlsEx, ICC_PROGRESS_CLASS, INITCOMMONCONTROLSEX};
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DispatchMessageW, GetMessageW, GetWindowLongPtrW, KillTimer,
    LoadCursorW, PostQuitMessage, RegisterClassW, SetTimer, SetWindowLongPtrW, ShowWindow,
    TranslateMessage, CREATESTRUCTW, CW_USEDEFAULT, GWLP_USERDATA, IDC_ARROW, MSG, SW_SHOW,
    WINDOW_EX_STYLE, WM_COMMAND, WM_CREATE, WM_CTLCOLORSTATIC, WM_DESTROY, WM_NCCREATE,
    WM_NCDESTROY, WM_TIMER, WNDCLASSW, WS_CAPTION, WS_MINIMIZEBOX, WS_OVERLAPPED, WS_SYSMENU,
};

const WINDOW_TITLE: &str = "Worker-Service Installer";
const FOOTER_TEXT: &str = "Worker-Service Installer \u{a9} 2024";
const WINDOW_WIDTH: i32 = 600;
const WINDOW_HEIGHT: i32 = 400;

const PROGRESS_TIMER_ID: usize = 1;
const PROGRESS_TICK_MS: u32 = 10;

const BN_CLICKED: u32 = 0;

/// `#1E1E2F` as 0x00BBGGRR
const BACKGROUND: COLORREF = COLORREF(0x002F_1E1E);
const TEXT_COLOR: COLORREF = COLORREF(0x00FF_FFFF);
const SUCCESS_COLOR: COLORREF = COLORREF(0x0000_8000);
const ERROR_COLOR: COLORREF = COLORREF(0x0000_00FF);

/// Open the installer window and pump messages until it closes
pub fn run(form: RegistrationForm, runner: Arc<dyn CommandRunner>) -> Result<()> {
    unsafe {
        CoInitializeEx(None, COINIT_APARTMENTTHREADED).ok()?;
    }

    let result = run_window(form, runner);

    unsafe {
        CoUninitialize();
    }

    result
}

fn run_window(form: RegistrationForm, runner: Arc<dyn CommandRunner>) -> Result<()> {
    let instance: HINSTANCE = unsafe { GetModuleHandleW(None)? }.into();

    unsafe {
        let init = INITCOMMONCONTROLSEX {
            dwSize: std::mem::size_of::<INITCOMMONCONTROLSEX>() as u32,
            dwICC: ICC_PROGRESS_CLASS,
        };
        if !InitCommonControlsEx(&init).as_bool() {
            warn!("InitCommonControlsEx failed; progress bar may not render");
        }
    }

    let background = unsafe { CreateSolidBrush(BACKGROUND) };
    let class_name = w!("WorkerServiceInstallerWindow");

    unsafe {
        let class = WNDCLASSW {
            lpfnWndProc: Some(window_proc),
            hInstance: instance,
            hCursor: LoadCursorW(None, IDC_ARROW)?,
            hbrBackground: background,
            lpszClassName: class_name,
            ..Default::default()
        };
        if RegisterClassW(&class) == 0 {
            return Err(windows::core::Error::from_win32().into());
        }
    }

    let window = Box::new(FormWindow {
        hwnd: HWND::default(),
        instance,
        controls: Controls::default(),
        form,
        worker: InstallWorker::new(runner),
        background,
        progress_position: 0,
        animating: false,
    });
    let window = Box::into_raw(window);

    // From WM_NCCREATE on, the window owns the box and frees it in WM_NCDESTROY
    let hwnd = unsafe {
        CreateWindowExW(
            WINDOW_EX_STYLE(0),
            class_name,
            &HSTRING::from(WINDOW_TITLE),
            WS_OVERLAPPED | WS_CAPTION | WS_SYSMENU | WS_MINIMIZEBOX,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            WINDOW_WIDTH,
            WINDOW_HEIGHT,
            None,
            None,
            instance,
            Some(window as *const c_void),
        )?
    };

    icon::apply_app_icon(hwnd);
    info!("Installer window opened");

    unsafe {
        let _ = ShowWindow(hwnd, SW_SHOW);

        let mut msg = MSG::default();
        while GetMessageW(&mut msg, None, 0, 0).0 > 0 {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }

        let _ = DeleteObject(background);
    }

    info!("Installer window closed");
    Ok(())
}

/// View state for one installer window
struct FormWindow {
    hwnd: HWND,
    instance: HINSTANCE,
    controls: Controls,
    form: RegistrationForm,
    worker: InstallWorker,
    background: HBRUSH,
    progress_position: usize,
    animating: bool,
}

impl FormWindow {
    fn create_controls(&mut self) -> windows::core::Result<()> {
        let factory = ControlFactory::new(self.hwnd, self.instance);

        factory.label("Published Path:", Bounds::new(15, 22, 125, 22))?;
        self.controls.path_edit = factory.edit(
            self.form.path(),
            Bounds::new(145, 18, 320, 26),
            controls::ID_PATH_EDIT,
        )?;
        factory.button("Browse", Bounds::new(475, 17, 95, 28), controls::ID_BROWSE, false)?;

        factory.label("Service Name:", Bounds::new(15, 62, 125, 22))?;
        self.controls.name_edit = factory.edit(
            self.form.name(),
            Bounds::new(145, 58, 425, 26),
            controls::ID_NAME_EDIT,
        )?;

        self.controls.install_button = factory.button(
            "Install Service",
            Bounds::new(220, 104, 150, 32),
            controls::ID_INSTALL,
            true,
        )?;

        self.controls.progress = factory.progress_bar(Bounds::new(15, 152, 555, 18))?;
        self.controls.message = factory.message_area(Bounds::new(15, 184, 555, 136))?;
        factory.centered_label(FOOTER_TEXT, Bounds::new(15, 330, 555, 20))?;

        Ok(())
    }

    fn browse(&mut self, picked: Option<PathBuf>) {
        if self.form.select_folder(&picked) {
            controls::set_text(self.controls.path_edit, self.form.path());
        }
    }

    fn install(&mut self) {
        self.form.set_path(controls::text(self.controls.path_edit));
        self.form.set_name(controls::text(self.controls.name_edit));

        self.worker.submit(&mut self.form);
        self.render();
    }

    fn tick(&mut self) {
        if self.animating {
            self.progress_position = controls::next_progress(self.progress_position);
            controls::set_progress(self.controls.progress, self.progress_position);
        }

        if self.worker.poll(&mut self.form) {
            self.render();
        }
    }

    /// Mirror the form's progress, message and busy state onto the controls
    fn render(&mut self) {
        match self.form.progress() {
            Progress::Running if !self.animating => self.start_progress(),
            Progress::Stopped if self.animating => self.stop_progress(),
            _ => {}
        }

        let text = self.form.message().map(|m| m.text.as_str()).unwrap_or("");
        controls::set_text(self.controls.message, text);
        controls::set_enabled(self.controls.install_button, !self.form.is_executing());
    }

    fn start_progress(&mut self) {
        self.progress_position = 0;
        controls::set_progress(self.controls.progress, 0);
        if unsafe { SetTimer(self.hwnd, PROGRESS_TIMER_ID, PROGRESS_TICK_MS, None) } == 0 {
            // Nothing would poll the worker; block until it reports instead
            error!("Failed to start progress timer, waiting for install inline");
            self.worker.wait(&mut self.form);
            return;
        }
        self.animating = true;
    }

    fn stop_progress(&mut self) {
        unsafe {
            let _ = KillTimer(self.hwnd, PROGRESS_TIMER_ID);
        }
        self.animating = false;
        self.progress_position = 0;
        controls::set_progress(self.controls.progress, 0);
    }

    fn paint_static(&self, hdc: HDC, control: HWND) -> LRESULT {
        let color = if control == self.controls.message {
            match self.form.message().map(|m| m.severity) {
                Some(Severity::Success) => SUCCESS_COLOR,
                Some(Severity::Error) => ERROR_COLOR,
                None => TEXT_COLOR,
            }
        } else {
            TEXT_COLOR
        };

        unsafe {
            SetTextColor(hdc, color);
            SetBkColor(hdc, BACKGROUND);
        }
        LRESULT(self.background.0 as isize)
    }

    fn destroy(&mut self) {
        if self.animating {
            self.stop_progress();
        }
        if self.worker.is_busy() {
            warn!("Window closed while an install is still running");
        }
    }
}

unsafe extern "system" fn window_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if msg == WM_NCCREATE {
        let create = &*(lparam.0 as *const CREATESTRUCTW);
        let window = create.lpCreateParams as *mut FormWindow;
        (*window).hwnd = hwnd;
        SetWindowLongPtrW(hwnd, GWLP_USERDATA, window as isize);
        return DefWindowProcW(hwnd, msg, wparam, lparam);
    }

    let window = GetWindowLongPtrW(hwnd, GWLP_USERDATA) as *mut FormWindow;
    if window.is_null() {
        return DefWindowProcW(hwnd, msg, wparam, lparam);
    }

    match msg {
        WM_CREATE => match (*window).create_controls() {
            Ok(()) => LRESULT(0),
            Err(e) => {
                error!("Failed to create controls: {}", e);
                LRESULT(-1)
            }
        },
        WM_COMMAND => {
            let id = (wparam.0 & 0xFFFF) as u16;
            let code = ((wparam.0 >> 16) & 0xFFFF) as u32;

            // Edit notifications arrive re-entrantly from SetWindowTextW
            if code == BN_CLICKED {
                match id {
                    controls::ID_BROWSE => {
                        // Modal loop dispatches timer ticks; no borrow held across it
                        let picked = FolderDialog::show(hwnd);
                        (*window).browse(picked);
                    }
                    controls::ID_INSTALL => (*window).install(),
                    _ => {}
                }
            }
            LRESULT(0)
        }
        WM_TIMER if wparam.0 == PROGRESS_TIMER_ID => {
            (*window).tick();
            LRESULT(0)
        }
        WM_CTLCOLORSTATIC => {
            (*window).paint_static(HDC(wparam.0 as *mut c_void), HWND(lparam.0 as *mut c_void))
        }
        WM_DESTROY => {
            (*window).destroy();
            PostQuitMessage(0);
            LRESULT(0)
        }
        WM_NCDESTROY => {
            SetWindowLongPtrW(hwnd, GWLP_USERDATA, 0);
            drop(Box::from_raw(window));
            DefWindowProcW(hwnd, msg, wparam, lparam)
        }
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}
