//! C-compatible API for the presentation layer.
//!
//! Ownership: engines come from `hccsurv_engine_new` and go back through
//! `hccsurv_engine_free`; every returned string is owned by the caller and
//! must be released with `hccsurv_free_str`.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::path::PathBuf;

use crate::common::config::AppCfg;
use crate::common::error::HccError;
use crate::common::log;
use crate::inference::service::{bootstrap, case_from_json};
use crate::inference::{InferenceEngine, Response};

/// ABI version to coordinate with the presentation layer.
#[no_mangle]
pub extern "C" fn hccsurv_api_version() -> u32 {
    1
}

/// Train once and return an engine, or null when start-up fails.
///
/// Configuration comes from the environment; a non-null `dataset_path`
/// overrides `HCCSURV_DATASET`.
#[no_mangle]
pub extern "C" fn hccsurv_engine_new(dataset_path: *const c_char) -> *mut InferenceEngine {
    let mut cfg = match AppCfg::load() {
        Ok(cfg) => cfg,
        Err(err) => {
            log::init(&AppCfg::default());
            tracing::error!(ev = "config_invalid", code = err.code() as u32, error = %err);
            return std::ptr::null_mut();
        }
    };
    if !dataset_path.is_null() {
        let path = unsafe { CStr::from_ptr(dataset_path) }.to_string_lossy();
        cfg.dataset_path = PathBuf::from(path.as_ref());
    }
    log::init(&cfg);

    match bootstrap(&cfg) {
        Ok(engine) => Box::into_raw(Box::new(engine)),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Run one inference; `case_json` is an object of field -> value.
#[no_mangle]
pub extern "C" fn hccsurv_infer(engine: *const InferenceEngine, case_json: *const c_char) -> *mut c_char {
    if engine.is_null() || case_json.is_null() {
        let err = HccError::invalid("null engine or case pointer");
        return string_to_raw(Response::from(&err).to_json());
    }
    let engine = unsafe { &*engine };
    let raw = unsafe { CStr::from_ptr(case_json) }.to_string_lossy();
    string_to_raw(infer_json(engine, &raw))
}

/// The accepted numeric ranges as text, one field per line.
#[no_mangle]
pub extern "C" fn hccsurv_ranges(engine: *const InferenceEngine) -> *mut c_char {
    if engine.is_null() {
        return std::ptr::null_mut();
    }
    let engine = unsafe { &*engine };
    string_to_raw(engine.schema().range_table().to_string())
}

/// Free strings allocated by this library.
#[no_mangle]
pub extern "C" fn hccsurv_free_str(ptr: *mut c_char) {
    if ptr.is_null() {
        return;
    }
    unsafe {
        drop(CString::from_raw(ptr));
    }
}

#[no_mangle]
pub extern "C" fn hccsurv_engine_free(engine: *mut InferenceEngine) {
    if engine.is_null() {
        return;
    }
    unsafe {
        drop(Box::from_raw(engine));
    }
}

/// JSON in, JSON out; the body of `hccsurv_infer`.
pub fn infer_json(engine: &InferenceEngine, raw: &str) -> String {
    let response = match case_from_json(raw) {
        Ok(case) => Response::from(engine.infer(&case)),
        Err(err) => {
            tracing::warn!(ev = "request_invalid", code = err.code() as u32, error = %err);
            Response::from(&err)
        }
    };
    response.to_json()
}

fn string_to_raw(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(cstring) => cstring.into_raw(),
        // Interior NUL; the fallback literal has none.
        Err(_) => CString::new(Response::FALLBACK)
            .map(CString::into_raw)
            .unwrap_or(std::ptr::null_mut()),
    }
}
