//! Gas Fee Core Library
//!
//! Custom transaction fee engine for the wallet's fee editing form.
//!
//! # Architecture
//!
//! This crate provides:
//! - **fees**: Price/limit validation, fee computation, tier classification
//!   and the per-form session state
//! - **ffi**: C-ABI exports for the mobile host
//! - **utils**: Structured logging
//!
//! # FFI Usage
//!
//! All public FFI functions are in the `ffi` module and follow this pattern:
//! - Input: JSON string (null-terminated C string)
//! - Output: JSON string (must be freed with `gasfee_free_string`)
//!
//! # Example
//!
//! ```rust,ignore
//! use gasfee_core::fees::{CustomFeeSession, FeeSettings, Field};
//!
//! let mut session = CustomFeeSession::open(init, FeeSettings::default())?;
//! session.on_input_changed(Field::Price, "2");
//! if let Some(event) = session.on_submit() {
//!     println!("{} ETH", event.computed_fee.native);
//! }
//! ```

pub mod error;
pub mod types;
pub mod ffi;
pub mod fees;
pub mod utils;

// Re-export key types for convenience
pub use error::{FeeError, FeeResult, ErrorCode};
pub use types::*;

pub use fees::{
    CustomFeeEvent,
    CustomFeeSession,
    FeeSchedule,
    FeeSessionInit,
    FeeSettings,
    FeeTier,
    FeeTierKind,
    Field,
};

// Re-export FFI functions at crate root
pub use ffi::{
    gasfee_free_string,
    gasfee_evaluate_custom_fee,
    gasfee_validate_price,
    gasfee_validate_limit,
    gasfee_session_open,
    gasfee_session_snapshot,
    gasfee_session_input,
    gasfee_session_submit,
    gasfee_session_cancel,
    gasfee_session_free,
};
