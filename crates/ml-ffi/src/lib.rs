//! C FFI bindings for ml-core
//!
//! This crate provides a C-compatible API so a desktop or web front end can
//! hand over the dropped file and render the result table itself.
//!
//! String accessors return null both for an out-of-range index and for a
//! value that contains a NUL character. Use `ml_outcome_to_json`, which
//! escapes NUL as `\u0000`, when the exact text is needed.

use ml_core::PipelineOutcome;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;
use std::slice;

/// Opaque handle to a pipeline outcome
pub struct MlOutcome {
    entries: Vec<(String, Vec<String>)>,
    message: Option<String>,
    json: String,
}

impl MlOutcome {
    fn new(outcome: PipelineOutcome) -> Self {
        let json = serde_json::to_string(&outcome).unwrap_or_default();
        match outcome {
            PipelineOutcome::Success(inversion) => Self {
                entries: inversion.into_map().into_iter().collect(),
                message: None,
                json,
            },
            PipelineOutcome::Failure(message) => Self {
                entries: Vec::new(),
                message: Some(message),
                json,
            },
        }
    }
}

/// Null when `s` contains an interior NUL, which a C string cannot hold
fn to_c_string(s: &str) -> *mut c_char {
    CString::new(s).map(CString::into_raw).unwrap_or(ptr::null_mut())
}

/// Run the inversion pipeline over a file's bytes
///
/// # Safety
/// - `bytes` must point to `len` readable bytes (may be null when `len` is 0)
/// - `key` and `value` must be valid NUL-terminated UTF-8 strings
/// - Returns null if an argument is null or not UTF-8
/// - Caller must free the result with `ml_free_outcome`
#[no_mangle]
pub unsafe extern "C" fn ml_run_pipeline(
    bytes: *const u8,
    len: usize,
    key: *const c_char,
    value: *const c_char,
) -> *mut MlOutcome {
    if (bytes.is_null() && len != 0) || key.is_null() || value.is_null() {
        return ptr::null_mut();
    }

    let data: &[u8] = if len == 0 {
        &[]
    } else {
        slice::from_raw_parts(bytes, len)
    };

    let (key, value) = match (CStr::from_ptr(key).to_str(), CStr::from_ptr(value).to_str()) {
        (Ok(k), Ok(v)) => (k, v),
        _ => return ptr::null_mut(),
    };

    let outcome = ml_core::run_pipeline(data, key, value);
    Box::into_raw(Box::new(MlOutcome::new(outcome)))
}

/// Free an outcome
///
/// # Safety
/// - `outcome` must be a valid pointer returned by `ml_run_pipeline` or null
#[no_mangle]
pub unsafe extern "C" fn ml_free_outcome(outcome: *mut MlOutcome) {
    if !outcome.is_null() {
        drop(Box::from_raw(outcome));
    }
}

/// Whether the run succeeded
///
/// # Safety
/// - `outcome` must be a valid pointer returned by `ml_run_pipeline`
#[no_mangle]
pub unsafe extern "C" fn ml_outcome_is_success(outcome: *const MlOutcome) -> bool {
    if outcome.is_null() {
        return false;
    }
    (*outcome).message.is_none()
}

/// Get the failure message
///
/// # Safety
/// - `outcome` must be a valid pointer returned by `ml_run_pipeline`
/// - Returns null if the run succeeded or the message contains NUL
/// - Caller must free the returned string with `ml_free_string`
#[no_mangle]
pub unsafe extern "C" fn ml_outcome_message(outcome: *const MlOutcome) -> *mut c_char {
    if outcome.is_null() {
        return ptr::null_mut();
    }
    (*outcome)
        .message
        .as_deref()
        .map(to_c_string)
        .unwrap_or(ptr::null_mut())
}

/// Get the number of distinct addresses
///
/// # Safety
/// - `outcome` must be a valid pointer returned by `ml_run_pipeline`
#[no_mangle]
pub unsafe extern "C" fn ml_outcome_entry_count(outcome: *const MlOutcome) -> usize {
    if outcome.is_null() {
        return 0;
    }
    (*outcome).entries.len()
}

/// Get an address by entry index
///
/// # Safety
/// - `outcome` must be a valid pointer returned by `ml_run_pipeline`
/// - Returns null if index is out of bounds or the address contains NUL
/// - Caller must free the returned string with `ml_free_string`
#[no_mangle]
pub unsafe extern "C" fn ml_outcome_token(outcome: *const MlOutcome, index: usize) -> *mut c_char {
    if outcome.is_null() {
        return ptr::null_mut();
    }
    (&(*outcome).entries)
        .get(index)
        .map(|(token, _)| to_c_string(token))
        .unwrap_or(ptr::null_mut())
}

/// Get the number of lists an entry belongs to
///
/// # Safety
/// - `outcome` must be a valid pointer returned by `ml_run_pipeline`
#[no_mangle]
pub unsafe extern "C" fn ml_outcome_key_count(outcome: *const MlOutcome, index: usize) -> usize {
    if outcome.is_null() {
        return 0;
    }
    (&(*outcome).entries)
        .get(index)
        .map(|(_, keys)| keys.len())
        .unwrap_or(0)
}

/// Get one list of an entry
///
/// # Safety
/// - `outcome` must be a valid pointer returned by `ml_run_pipeline`
/// - Returns null if either index is out of bounds or the list contains NUL
/// - Caller must free the returned string with `ml_free_string`
#[no_mangle]
pub unsafe extern "C" fn ml_outcome_key(
    outcome: *const MlOutcome,
    index: usize,
    key_index: usize,
) -> *mut c_char {
    if outcome.is_null() {
        return ptr::null_mut();
    }
    (&(*outcome).entries)
        .get(index)
        .and_then(|(_, keys)| keys.get(key_index))
        .map(|key| to_c_string(key))
        .unwrap_or(ptr::null_mut())
}

/// Get the whole outcome as JSON
///
/// # Safety
/// - `outcome` must be a valid pointer returned by `ml_run_pipeline`
/// - Caller must free the returned string with `ml_free_string`
#[no_mangle]
pub unsafe extern "C" fn ml_outcome_to_json(outcome: *const MlOutcome) -> *mut c_char {
    if outcome.is_null() {
        return ptr::null_mut();
    }
    to_c_string(&(*outcome).json)
}

/// Free a string returned by other FFI functions
///
/// # Safety
/// - `s` must be a valid pointer returned by a ml_* function or null
#[no_mangle]
pub unsafe extern "C" fn ml_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}
