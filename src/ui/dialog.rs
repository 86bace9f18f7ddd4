//! Native folder picker

use std::ffi::c_void;
use std::path::PathBuf;
use tracing::{debug, warn};
use windows::core::{w, HRESULT};
use windows::Win32::Foundation::{ERROR_CANCELLED, HWND};
use windows::Win32::System::Com::{CoCreateInstance, CoTaskMemFree, CLSCTX_INPROC_SERVER};
use windows::Win32::UI::Shell::{
    FileOpenDialog, IFileOpenDialog, FOS_FORCEFILESYSTEM, FOS_PICKFOLDERS, SIGDN_FILESYSPATH,
};

/// `IFileOpenDialog` in folder-picking mode
pub struct FolderDialog;

impl FolderDialog {
    /// Show the dialog modally over `owner`
    ///
    /// Cancel and dialog failures both yield `None`; failures are logged.
    pub fn show(owner: HWND) -> Option<PathBuf> {
        match Self::try_show(owner) {
            Ok(Some(path)) => Some(path),
            Ok(None) => {
                debug!("Folder selection cancelled");
                None
            }
            Err(e) => {
                warn!("Folder dialog failed: {}", e);
                None
            }
        }
    }

    fn try_show(owner: HWND) -> windows::core::Result<Option<PathBuf>> {
        unsafe {
            let dialog: IFileOpenDialog =
                CoCreateInstance(&FileOpenDialog, None, CLSCTX_INPROC_SERVER)?;

            let options = dialog.GetOptions()?;
            dialog.SetOptions(options | FOS_PICKFOLDERS | FOS_FORCEFILESYSTEM)?;
            dialog.SetTitle(w!("Select Published Folder"))?;

            if let Err(e) = dialog.Show(owner) {
                if e.code() == HRESULT::from_win32(ERROR_CANCELLED.0) {
                    return Ok(None);
                }
                return Err(e);
            }

            let item = dialog.GetResult()?;
            let raw = item.GetDisplayName(SIGDN_FILESYSPATH)?;
            let path = String::from_utf16_lossy(raw.as_wide());
            CoTaskMemFree(Some(raw.0 as *const c_void));

            Ok(Some(PathBuf::from(path)))
        }
    }
}
