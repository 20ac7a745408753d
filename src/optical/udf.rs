//! UDF burn backend (spec.md §4.4 "UDF engine"): a dynamically loaded
//! `libudfburn` shared object, grounded on the original's `DUDFBurnEngine`
//! FFI shape. Loaded lazily — most systems never touch the UDF path, so
//! a missing library is not an error until someone actually asks to burn
//! UDF media.

use std::ffi::{c_char, c_double, c_int, c_long, CStr, CString};
use std::sync::Mutex;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{DeviceError, DeviceErrorKind};

#[repr(C)]
struct ProgressInfo {
    total_size: c_long,
    wrote_size: c_long,
    progress: c_double,
}

type ProgressCb = unsafe extern "C" fn(*const ProgressInfo);
type UburnInit = unsafe extern "C" fn();
type UburnDoBurn = unsafe extern "C" fn(*const c_char, *const c_char, *const c_char) -> c_int;
type UburnRegiCb = unsafe extern "C" fn(ProgressCb);
type UburnGetErrors = unsafe extern "C" fn(*mut c_int) -> *mut *mut c_char;
type UburnShowVerbose = unsafe extern "C" fn();
type UburnRedirectOutput = unsafe extern "C" fn(c_int, c_int);

/// The running job's progress sink. The library's callback ABI passes no
/// user-data pointer, so like the original we bind a single global
/// closure for the duration of one burn (spec.md §4.4: only one UDF job
/// ever runs at a time, guarded by [`super::engine::OpticalDiscManager`]).
static PROGRESS_SINK: Lazy<Mutex<Option<Box<dyn FnMut(f64) + Send>>>> = Lazy::new(|| Mutex::new(None));

unsafe extern "C" fn progress_trampoline(info: *const ProgressInfo) {
    if info.is_null() {
        return;
    }
    let progress = (*info).progress;
    if let Some(sink) = PROGRESS_SINK.lock().unwrap().as_mut() {
        sink(progress);
    }
}

pub struct UdfBurnLibrary {
    _library: libloading::Library,
    init: UburnInit,
    do_burn: UburnDoBurn,
    register_callback: UburnRegiCb,
    show_verbose: UburnShowVerbose,
    redirect_output: UburnRedirectOutput,
    get_errors: UburnGetErrors,
}

impl UdfBurnLibrary {
    /// Resolves every symbol up front, same as the original constructor
    /// — a library missing even one export is unusable (spec.md §9: no
    /// partial-capability fallback for the UDF path).
    pub fn load() -> Result<Self, DeviceError> {
        unsafe {
            let library = libloading::Library::new("libudfburn.so")
                .map_err(|e| DeviceError::with_message(DeviceErrorKind::UserNoDriver, e.to_string()))?;

            let init: UburnInit = *library
                .get(b"burn_init\0")
                .map_err(|e| DeviceError::with_message(DeviceErrorKind::UserNoDriver, e.to_string()))?;
            let do_burn: UburnDoBurn = *library
                .get(b"burn_burn_to_disc\0")
                .map_err(|e| DeviceError::with_message(DeviceErrorKind::UserNoDriver, e.to_string()))?;
            let register_callback: UburnRegiCb = *library
                .get(b"burn_register_progress_callback\0")
                .map_err(|e| DeviceError::with_message(DeviceErrorKind::UserNoDriver, e.to_string()))?;
            let show_verbose: UburnShowVerbose = *library
                .get(b"burn_show_verbose_information\0")
                .map_err(|e| DeviceError::with_message(DeviceErrorKind::UserNoDriver, e.to_string()))?;
            let redirect_output: UburnRedirectOutput = *library
                .get(b"burn_redirect_output\0")
                .map_err(|e| DeviceError::with_message(DeviceErrorKind::UserNoDriver, e.to_string()))?;
            let get_errors: UburnGetErrors = *library
                .get(b"burn_get_last_errors\0")
                .map_err(|e| DeviceError::with_message(DeviceErrorKind::UserNoDriver, e.to_string()))?;

            Ok(Self { _library: library, init, do_burn, register_callback, show_verbose, redirect_output, get_errors })
        }
    }

    /// Burns `file` to `dev` under UDF, reporting fractional progress
    /// through `on_progress`. On failure, collects the library's own
    /// error log and supplements it with the on-disk burn log (spec.md
    /// §4.4, grounded on `readErrorsFromLog`).
    pub fn do_burn(&self, dev: &str, file: &str, volume_id: &str, on_progress: impl FnMut(f64) + Send + 'static) -> Result<(), Vec<String>> {
        *PROGRESS_SINK.lock().unwrap() = Some(Box::new(on_progress));

        let dev_c = CString::new(dev).unwrap();
        let file_c = CString::new(file).unwrap();
        let vol_c = CString::new(volume_id).unwrap();

        let ret = unsafe {
            (self.init)();
            (self.register_callback)(progress_trampoline);
            (self.show_verbose)();
            (self.redirect_output)(1, 0);
            (self.do_burn)(dev_c.as_ptr(), file_c.as_ptr(), vol_c.as_ptr())
        };

        *PROGRESS_SINK.lock().unwrap() = None;

        if ret == 0 {
            return Ok(());
        }

        let mut messages = self.collect_library_errors();
        messages.extend(read_errors_from_log());
        Err(messages)
    }

    fn collect_library_errors(&self) -> Vec<String> {
        let mut count: c_int = 0;
        let errors = unsafe { (self.get_errors)(&mut count) };
        if errors.is_null() || count <= 0 {
            return Vec::new();
        }
        let mut out = Vec::with_capacity(count as usize);
        for i in (0..count).rev() {
            unsafe {
                let ptr = *errors.offset(i as isize);
                if !ptr.is_null() {
                    out.push(CStr::from_ptr(ptr).to_string_lossy().into_owned());
                }
            }
        }
        out
    }
}

/// Scans the most recently modified burn log under
/// `~/.cache/deepin/discburn/uburn/` for `Warning`/`Error` lines (spec.md
/// §4.4, grounded on the original's `readErrorsFromLog`), stripping the
/// per-device cache path prefix the library embeds in its own messages.
fn read_errors_from_log() -> Vec<String> {
    let Some(home) = std::env::var_os("HOME") else { return Vec::new() };
    let log_root = std::path::Path::new(&home).join(".cache/deepin/discburn/uburn");

    let Ok(entries) = std::fs::read_dir(&log_root) else { return Vec::new() };
    let mut dirs: Vec<_> = entries.filter_map(|e| e.ok()).collect();
    dirs.sort_by_key(|e| e.metadata().and_then(|m| m.modified()).ok());
    let Some(latest) = dirs.last() else { return Vec::new() };

    let Ok(contents) = std::fs::read_to_string(latest.path().join("log")) else { return Vec::new() };

    static STRIP_CACHE_PATH: Lazy<Regex> = Lazy::new(|| Regex::new(r"/home/[^/]*/\.cache/deepin/discburn/_dev_sr[0-9]*/").unwrap());

    contents
        .lines()
        .filter(|line| line.starts_with("Warning") || line.starts_with("Error"))
        .map(|line| STRIP_CACHE_PATH.replace_all(line, "").into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_per_device_cache_path() {
        let log_dir = tempfile::tempdir().unwrap();
        std::env::set_var("HOME", log_dir.path());
        let burn_dir = log_dir.path().join(".cache/deepin/discburn/uburn/burn-1");
        std::fs::create_dir_all(&burn_dir).unwrap();
        std::fs::write(
            burn_dir.join("log"),
            "Warning: /home/alice/.cache/deepin/discburn/_dev_sr0/scratch missing\nharmless line\n",
        )
        .unwrap();

        let errors = read_errors_from_log();
        assert_eq!(errors, vec!["Warning: scratch missing".to_string()]);
    }
}
