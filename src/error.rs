//! Unified error types for the gas fee core
//!
//! Input validation never surfaces here; these errors only describe
//! construction problems and bridge misuse, and they cross the FFI
//! boundary as structured JSON.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Main error type for all fee operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl FeeError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, msg)
    }

    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ParseError, msg)
    }

    pub fn overflow(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::AmountOverflow, msg)
    }

    pub fn unordered_schedule(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnorderedSchedule, msg)
    }

    pub fn session_closed() -> Self {
        Self::new(ErrorCode::SessionClosed, "Fee session is already closed")
    }

    pub fn bridge_unavailable(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::BridgeUnavailable, msg)
    }
}

impl fmt::Display for FeeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for FeeError {}

/// Error codes for categorization
///
/// Callers branch on these instead of matching message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Input errors
    InvalidInput,
    AmountOverflow,
    UnorderedSchedule,

    // Parse errors
    ParseError,

    // Session / bridge errors
    SessionClosed,
    BridgeUnavailable,

    // Internal
    Internal,
}

/// Result type alias for fee operations
pub type FeeResult<T> = Result<T, FeeError>;
