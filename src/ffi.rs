//! FFI Layer for the gas fee core
//!
//! All C-ABI exports are defined here. This is the ONLY file that should
//! contain `extern "C"` functions. All functions follow a consistent pattern:
//! - Input: JSON string (null-terminated C string)
//! - Output: JSON string (must be freed with `gasfee_free_string`)
//!
//! Error handling: All functions return JSON with `success` field.
//! On error, `success: false` and `error` object is populated.
//!
//! Sessions are opaque pointers owned by the caller. Each one must be
//! released with `gasfee_session_free` and must not be shared between
//! threads.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use crate::error::FeeError;
use crate::fees::{
    self, CustomFeeSession, EvaluateRequest, FeeSessionInit, FeeSettings, Field, FieldRequest,
};
use crate::log_error;
use crate::types::*;

const LOG_MODULE: &str = "ffi";

// =============================================================================
// Memory Management
// =============================================================================

/// Free a string returned by any gasfee_* function
///
/// # Safety
/// The pointer must have been returned by a gasfee_* function
#[unsafe(no_mangle)]
pub extern "C" fn gasfee_free_string(s: *mut c_char) {
    if s.is_null() {
        return;
    }
    unsafe {
        let _ = CString::from_raw(s);
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Convert C string to an owned Rust string, returning error JSON if invalid
fn parse_input(input: *const c_char) -> Result<String, *mut c_char> {
    if input.is_null() {
        return Err(error_response(FeeError::invalid_input("Null input pointer")));
    }

    let c_str = unsafe { CStr::from_ptr(input) };
    match c_str.to_str() {
        Ok(s) => Ok(s.to_owned()),
        Err(_) => Err(error_response(FeeError::invalid_input("Invalid UTF-8 string"))),
    }
}

/// Deserialize the request body, returning error JSON if malformed
fn parse_request<T: serde::de::DeserializeOwned>(input: *const c_char) -> Result<T, *mut c_char> {
    let json_str = parse_input(input)?;
    serde_json::from_str(&json_str)
        .map_err(|e| error_response(FeeError::parse_error(format!("Invalid JSON: {}", e))))
}

/// Create a success response JSON string
fn success_response<T: serde::Serialize>(data: T) -> *mut c_char {
    let response = ApiResponse::ok(data);
    string_to_ptr(response.to_json())
}

/// Create an error response JSON string
fn error_response(error: FeeError) -> *mut c_char {
    let response: ApiResponse<()> = ApiResponse::err(error);
    string_to_ptr(response.to_json())
}

/// Convert Rust string to C string pointer
fn string_to_ptr(s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(c_str) => c_str.into_raw(),
        Err(_) => {
            // Last resort: a static body without interior NULs
            const FALLBACK: &[u8] =
                b"{\"success\":false,\"error\":{\"code\":\"internal\",\"message\":\"String conversion failed\",\"details\":null}}\0";
            match CStr::from_bytes_with_nul(FALLBACK) {
                Ok(c_str) => c_str.to_owned().into_raw(),
                Err(_) => std::ptr::null_mut(),
            }
        }
    }
}

/// Borrow a session handle, returning error JSON on a null handle
fn session_mut<'a>(session: *mut CustomFeeSession) -> Result<&'a mut CustomFeeSession, *mut c_char> {
    if session.is_null() {
        return Err(error_response(FeeError::bridge_unavailable("Null session handle")));
    }
    Ok(unsafe { &mut *session })
}

/// Hand an error response to the caller, or free it when nobody asked
fn set_error_out(error_out: *mut *mut c_char, error: *mut c_char) {
    if error_out.is_null() {
        gasfee_free_string(error);
        return;
    }
    unsafe {
        *error_out = error;
    }
}

// =============================================================================
// Stateless Operations
// =============================================================================

/// Evaluate a custom gas price and gas limit in one call
///
/// # Input
/// ```json
/// {
///   "chain": "ethereum",
///   "reference_computation_size": 21000,
///   "price_ceiling": "5",
///   "current_price": "1",
///   "schedule": { "fast": {...}, "normal": {...}, "slow": {...} },
///   "price": "1",
///   "limit": "21000"
/// }
/// ```
#[unsafe(no_mangle)]
pub extern "C" fn gasfee_evaluate_custom_fee(input: *const c_char) -> *mut c_char {
    let request: EvaluateRequest = match parse_request(input) {
        Ok(r) => r,
        Err(ptr) => return ptr,
    };

    match fees::evaluate_custom_fee(request) {
        Ok(snapshot) => success_response(snapshot),
        Err(e) => error_response(e),
    }
}

/// Check gas price text against its bounds
///
/// # Input
/// ```json
/// { "reference_computation_size": 21000, "price_ceiling": "5", "text": "0.3" }
/// ```
#[unsafe(no_mangle)]
pub extern "C" fn gasfee_validate_price(input: *const c_char) -> *mut c_char {
    let request: FieldRequest = match parse_request(input) {
        Ok(r) => r,
        Err(ptr) => return ptr,
    };

    match request.bounds() {
        Ok(bounds) => success_response(fees::validate_price(&request.text, &bounds)),
        Err(e) => error_response(e),
    }
}

/// Check gas limit text against its bounds
#[unsafe(no_mangle)]
pub extern "C" fn gasfee_validate_limit(input: *const c_char) -> *mut c_char {
    let request: FieldRequest = match parse_request(input) {
        Ok(r) => r,
        Err(ptr) => return ptr,
    };

    match request.bounds() {
        Ok(bounds) => success_response(fees::validate_limit(&request.text, &bounds)),
        Err(e) => error_response(e),
    }
}

// =============================================================================
// Session Operations
// =============================================================================

/// Open a custom fee session
///
/// Returns null when the input is malformed or the bounds are invalid. The
/// reason is then written to `error_out` as an error response, which the
/// caller frees with `gasfee_free_string`. `error_out` may be null.
///
/// # Input
/// ```json
/// {
///   "chain": "ethereum",
///   "reference_computation_size": 21000,
///   "price_ceiling": "5",
///   "current_price": "1.7",
///   "schedule": { ... }
/// }
/// ```
#[unsafe(no_mangle)]
pub extern "C" fn gasfee_session_open(
    input: *const c_char,
    error_out: *mut *mut c_char,
) -> *mut CustomFeeSession {
    #[derive(serde::Deserialize)]
    struct OpenRequest {
        #[serde(default)]
        chain: Chain,
        #[serde(default)]
        settings: Option<FeeSettings>,
        #[serde(flatten)]
        init: FeeSessionInit,
    }

    set_error_out(error_out, std::ptr::null_mut());

    let request: OpenRequest = match parse_request(input) {
        Ok(r) => r,
        Err(ptr) => {
            log_error!(LOG_MODULE, "Rejected session request");
            set_error_out(error_out, ptr);
            return std::ptr::null_mut();
        }
    };

    let settings = request
        .settings
        .unwrap_or_else(|| FeeSettings::for_chain(request.chain));
    match CustomFeeSession::open(request.init, settings) {
        Ok(session) => Box::into_raw(Box::new(session)),
        Err(e) => {
            log_error!(LOG_MODULE, "Failed to open fee session", error = e);
            set_error_out(error_out, error_response(e));
            std::ptr::null_mut()
        }
    }
}

/// Current state of a session
#[unsafe(no_mangle)]
pub extern "C" fn gasfee_session_snapshot(session: *mut CustomFeeSession) -> *mut c_char {
    match session_mut(session) {
        Ok(session) => success_response(session.snapshot()),
        Err(ptr) => ptr,
    }
}

/// Apply a keystroke to one field
///
/// # Input
/// ```json
/// { "field": "price", "text": "2.5" }
/// ```
#[unsafe(no_mangle)]
pub extern "C" fn gasfee_session_input(session: *mut CustomFeeSession, input: *const c_char) -> *mut c_char {
    #[derive(serde::Deserialize)]
    struct InputRequest {
        field: Field,
        text: String,
    }

    let session = match session_mut(session) {
        Ok(s) => s,
        Err(ptr) => return ptr,
    };
    let request: InputRequest = match parse_request(input) {
        Ok(r) => r,
        Err(ptr) => return ptr,
    };

    session.on_input_changed(request.field, &request.text);
    success_response(session.snapshot())
}

/// Confirm the session; `data` is the event, or null when nothing was emitted
#[unsafe(no_mangle)]
pub extern "C" fn gasfee_session_submit(session: *mut CustomFeeSession) -> *mut c_char {
    let session = match session_mut(session) {
        Ok(s) => s,
        Err(ptr) => return ptr,
    };

    if session.is_closed() {
        return error_response(FeeError::session_closed());
    }
    success_response(session.on_submit())
}

/// Close the session without emitting an event
#[unsafe(no_mangle)]
pub extern "C" fn gasfee_session_cancel(session: *mut CustomFeeSession) {
    if let Ok(session) = session_mut(session) {
        session.cancel();
    }
}

/// Release a session handle
///
/// # Safety
/// The pointer must come from `gasfee_session_open` and not be used again
#[unsafe(no_mangle)]
pub extern "C" fn gasfee_session_free(session: *mut CustomFeeSession) {
    if session.is_null() {
        return;
    }
    unsafe {
        drop(Box::from_raw(session));
    }
}
