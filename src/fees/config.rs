//! Fee form configuration
//!
//! Per-chain presets for the price floor, gas limit headroom, rate
//! unit scale and display symbols.

use crate::error::{FeeError, FeeResult};
use crate::types::Chain;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lowest accepted gas price, in gwei
pub const DEFAULT_PRICE_FLOOR: Decimal = Decimal::from_parts(4, 0, 0, false, 1);

/// Gas limit may be raised up to this multiple of the reference size
pub const DEFAULT_LIMIT_MULTIPLIER: u64 = 10;

/// Gas price is quoted in gwei: 10^9 wei per gwei, 10^9 gwei per coin
pub const DEFAULT_RATE_DECIMALS: u32 = 9;

/// Largest scale that still fits in a u64 power of ten
const MAX_RATE_DECIMALS: u32 = 18;

/// Settings for one custom fee form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSettings {
    /// Minimum gas price
    pub price_floor: Decimal,
    /// `limit_max = limit_min * limit_multiplier`
    pub limit_multiplier: u64,
    /// Decimal places between the rate unit and the native coin
    pub rate_decimals: u32,
    /// Coin symbol appended to native amounts
    pub native_unit: String,
    /// Currency symbol prefixed to fiat amounts
    pub fiat_symbol: String,
}

impl Default for FeeSettings {
    fn default() -> Self {
        Self::for_chain(Chain::default())
    }
}

impl FeeSettings {
    /// Preset for a chain
    pub fn for_chain(chain: Chain) -> Self {
        Self {
            price_floor: DEFAULT_PRICE_FLOOR,
            limit_multiplier: DEFAULT_LIMIT_MULTIPLIER,
            rate_decimals: DEFAULT_RATE_DECIMALS,
            native_unit: chain.symbol().to_string(),
            fiat_symbol: "$".to_string(),
        }
    }

    pub fn with_fiat_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.fiat_symbol = symbol.into();
        self
    }

    pub fn with_price_floor(mut self, floor: Decimal) -> Self {
        self.price_floor = floor;
        self
    }

    /// Divisor turning `price * limit` into native units
    pub fn rate_scale(&self) -> Decimal {
        Decimal::from(10u64.pow(self.rate_decimals.min(MAX_RATE_DECIMALS)))
    }

    /// Validate settings
    pub fn validate(&self) -> FeeResult<()> {
        if self.price_floor.is_sign_negative() {
            return Err(FeeError::invalid_input("Price floor cannot be negative"));
        }
        if self.limit_multiplier == 0 {
            return Err(FeeError::invalid_input("Limit multiplier must be at least 1"));
        }
        if self.rate_decimals > MAX_RATE_DECIMALS {
            return Err(FeeError::invalid_input(format!(
                "Rate decimals {} exceeds maximum of {}",
                self.rate_decimals, MAX_RATE_DECIMALS
            )));
        }
        if self.native_unit.trim().is_empty() {
            return Err(FeeError::invalid_input("Native unit symbol is required"));
        }
        Ok(())
    }
}
