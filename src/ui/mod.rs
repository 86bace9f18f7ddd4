//! Win32 front end for the registration form

mod controls;
mod dialog;
mod icon;
mod window;

pub use window::run;

use windows::Win32::System::Console::{AllocConsole, AttachConsole, ATTACH_PARENT_PROCESS};

/// Route stdout/stderr to the launching console
///
/// The binary uses the GUI subsystem, so there is no console by default.
/// With `allocate`, a new console is opened when there is no parent one.
pub fn attach_console(allocate: bool) -> bool {
    unsafe {
        if AttachConsole(ATTACH_PARENT_PROCESS).is_ok() {
            return true;
        }
        allocate && AllocConsole().is_ok()
    }
}
