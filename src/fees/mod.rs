//! Custom Fee Module
//!
//! Validates a user-entered gas price and gas limit against the current
//! fee schedule and turns them into a fee preview.

mod amount;
mod config;
mod estimator;
mod session;
mod types;

pub use amount::*;
pub use config::*;
pub use estimator::*;
pub use session::*;
pub use types::*;

use crate::error::FeeResult;
use crate::types::Chain;
use serde::{Deserialize, Serialize};

/// One-shot evaluation request, as sent over the bridge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateRequest {
    #[serde(default)]
    pub chain: Chain,
    /// Overrides the chain preset when present
    #[serde(default)]
    pub settings: Option<FeeSettings>,
    #[serde(flatten)]
    pub init: FeeSessionInit,
    pub price: String,
    pub limit: String,
}

impl EvaluateRequest {
    pub fn resolved_settings(&self) -> FeeSettings {
        self.settings
            .clone()
            .unwrap_or_else(|| FeeSettings::for_chain(self.chain))
    }
}

/// Evaluate a price/limit pair without keeping a session around
pub fn evaluate_custom_fee(request: EvaluateRequest) -> FeeResult<SessionSnapshot> {
    let settings = request.resolved_settings();
    let input = CustomFeeInput {
        price: request.price,
        limit: request.limit,
    };
    let session = CustomFeeSession::open_with_input(request.init, settings, input)?;
    Ok(session.snapshot())
}

/// Bounds-only request for checking a single field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldRequest {
    #[serde(default)]
    pub chain: Chain,
    #[serde(default)]
    pub settings: Option<FeeSettings>,
    pub reference_computation_size: u64,
    pub price_ceiling: rust_decimal::Decimal,
    pub text: String,
}

impl FieldRequest {
    pub fn bounds(&self) -> FeeResult<FeeBounds> {
        let settings = self
            .settings
            .clone()
            .unwrap_or_else(|| FeeSettings::for_chain(self.chain));
        settings.validate()?;
        FeeBounds::new(&settings, self.reference_computation_size, self.price_ceiling)
    }
}
