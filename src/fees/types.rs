//! Fee estimation types and data structures

use super::amount::{format_plain, parse_fiat_text};
use super::config::FeeSettings;
use crate::error::{FeeError, FeeResult};
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

// =============================================================================
// Fee Schedule
// =============================================================================

/// Settlement-speed tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeTierKind {
    Fast,
    Normal,
    Slow,
}

impl fmt::Display for FeeTierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeeTierKind::Fast => write!(f, "fast"),
            FeeTierKind::Normal => write!(f, "normal"),
            FeeTierKind::Slow => write!(f, "slow"),
        }
    }
}

/// One row of the network fee schedule
///
/// Accepts the bridge shape `{"gas_price": 86, "time": 1, "fee": "0.00344", "fiat": "4.71 USD"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeTier {
    /// Fee per computation unit, in minor units (gwei)
    #[serde(alias = "gas_price", alias = "feerate")]
    pub fee_rate: Decimal,
    /// Absolute fee in native units for the reference computation size
    #[serde(alias = "fee")]
    pub fee_amount: Decimal,
    /// `fee_amount` in the display fiat at capture time
    #[serde(alias = "fiat", deserialize_with = "deserialize_fiat")]
    pub fiat_amount: Decimal,
    #[serde(alias = "time")]
    pub settlement_minutes: u32,
}

impl FeeTier {
    pub fn new(fee_rate: Decimal, fee_amount: Decimal, fiat_amount: Decimal, settlement_minutes: u32) -> Self {
        Self {
            fee_rate,
            fee_amount,
            fiat_amount,
            settlement_minutes,
        }
    }
}

fn deserialize_fiat<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawFiat {
        Text(String),
        Number(f64),
    }

    match RawFiat::deserialize(deserializer)? {
        RawFiat::Text(text) => parse_fiat_text(&text).map_err(de::Error::custom),
        RawFiat::Number(n) => Decimal::try_from(n).map_err(de::Error::custom),
    }
}

/// Fast, normal and slow tiers captured in one bridge round trip
///
/// Expected to be ordered `fast >= normal >= slow` by fee amount. The
/// ordering is trusted, not re-sorted; see [`FeeSchedule::check_ordering`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub fast: FeeTier,
    pub normal: FeeTier,
    pub slow: FeeTier,
}

impl FeeSchedule {
    pub fn new(fast: FeeTier, normal: FeeTier, slow: FeeTier) -> Self {
        Self { fast, normal, slow }
    }

    pub fn tier(&self, kind: FeeTierKind) -> &FeeTier {
        match kind {
            FeeTierKind::Fast => &self.fast,
            FeeTierKind::Normal => &self.normal,
            FeeTierKind::Slow => &self.slow,
        }
    }

    /// Report a schedule whose fee amounts are not descending
    pub fn check_ordering(&self) -> FeeResult<()> {
        if self.fast.fee_amount >= self.normal.fee_amount
            && self.normal.fee_amount >= self.slow.fee_amount
        {
            return Ok(());
        }
        Err(FeeError::unordered_schedule("Fee tiers are not ordered fast >= normal >= slow")
            .with_details(format!(
                "fast={}, normal={}, slow={}",
                format_plain(self.fast.fee_amount),
                format_plain(self.normal.fee_amount),
                format_plain(self.slow.fee_amount),
            )))
    }
}

// =============================================================================
// Bounds and Input
// =============================================================================

/// Accepted ranges for one dialog session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeBounds {
    pub price_min: Decimal,
    pub price_max: Decimal,
    pub limit_min: u64,
    pub limit_max: u64,
}

impl FeeBounds {
    /// Derive bounds from the caller's reference size and price ceiling
    pub fn new(settings: &FeeSettings, reference_size: u64, price_ceiling: Decimal) -> FeeResult<Self> {
        if reference_size == 0 {
            return Err(FeeError::invalid_input("Reference computation size must be positive"));
        }
        if price_ceiling.is_sign_negative() {
            return Err(FeeError::invalid_input("Price ceiling cannot be negative"));
        }

        let limit_max = reference_size
            .checked_mul(settings.limit_multiplier)
            .ok_or_else(|| FeeError::overflow("Gas limit ceiling overflows"))?;

        Ok(Self {
            price_min: settings.price_floor,
            price_max: price_ceiling,
            limit_min: reference_size,
            limit_max,
        })
    }
}

/// Input field of the custom fee form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Price,
    Limit,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Price => write!(f, "price"),
            Field::Limit => write!(f, "limit"),
        }
    }
}

/// Raw text currently in the two input fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomFeeInput {
    pub price: String,
    pub limit: String,
}

impl CustomFeeInput {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Price => &self.price,
            Field::Limit => &self.limit,
        }
    }

    pub fn set(&mut self, field: Field, text: &str) {
        match field {
            Field::Price => self.price = text.to_string(),
            Field::Limit => self.limit = text.to_string(),
        }
    }
}

// =============================================================================
// Validation
// =============================================================================

/// A parsed value that falls outside its bounds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeViolation {
    pub field: Field,
    pub value: String,
    pub min: String,
    pub max: String,
}

impl RangeViolation {
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RangeViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field {
            Field::Price => write!(f, "Gas price must be between {} and {}", self.min, self.max),
            Field::Limit => write!(f, "Gas limit must be between {} and {}", self.min, self.max),
        }
    }
}

/// Result of checking one field
///
/// `Incomplete` covers empty and unparseable text; it is never shown.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationOutcome<T> {
    Valid { value: T },
    Incomplete,
    OutOfRange { violation: RangeViolation },
}

impl<T> ValidationOutcome<T> {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid { .. })
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            ValidationOutcome::Valid { value } => Some(value),
            _ => None,
        }
    }

    pub fn violation(&self) -> Option<&RangeViolation> {
        match self {
            ValidationOutcome::OutOfRange { violation } => Some(violation),
            _ => None,
        }
    }

    /// User-facing text, present only for range failures
    pub fn message(&self) -> Option<String> {
        self.violation().map(RangeViolation::message)
    }
}

/// Per-field validity; submission needs both
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub price_valid: bool,
    pub limit_valid: bool,
}

impl ValidationResult {
    pub fn both_valid(&self) -> bool {
        self.price_valid && self.limit_valid
    }
}

// =============================================================================
// Computed Fee and Display
// =============================================================================

/// Total fee for a custom price/limit pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedFee {
    pub native_amount: Decimal,
    /// Already truncated to two fractional digits
    pub fiat_amount: Decimal,
    pub tier: FeeTierKind,
    pub settlement_minutes: u32,
}

impl ComputedFee {
    pub fn native_text(&self) -> String {
        format_plain(self.native_amount)
    }

    pub fn fiat_text(&self) -> String {
        format_plain(self.fiat_amount)
    }

    pub fn summary(&self) -> FeeSummary {
        FeeSummary {
            native: self.native_text(),
            fiat: self.fiat_text(),
            settlement_minutes: self.settlement_minutes,
        }
    }
}

/// String form of a computed fee as handed back to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSummary {
    pub native: String,
    pub fiat: String,
    pub settlement_minutes: u32,
}

/// Placeholder shown while no fee can be computed
pub const CLEARED_TEXT: &str = "-";

/// Rendered strings for the fee preview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeDisplay {
    pub native_text: String,
    /// `None` hides the fiat line
    pub fiat_text: Option<String>,
    pub settlement_text: String,
}

impl FeeDisplay {
    pub fn cleared() -> Self {
        Self {
            native_text: CLEARED_TEXT.to_string(),
            fiat_text: None,
            settlement_text: CLEARED_TEXT.to_string(),
        }
    }

    pub fn for_fee(fee: &ComputedFee, settings: &FeeSettings) -> Self {
        Self {
            native_text: format!("{} {}", fee.native_text(), settings.native_unit),
            fiat_text: Some(format!("≈ {} {}", settings.fiat_symbol, fee.fiat_text())),
            settlement_text: settlement_text(fee.settlement_minutes),
        }
    }

    pub fn is_cleared(&self) -> bool {
        self.fiat_text.is_none() && self.native_text == CLEARED_TEXT
    }
}

impl Default for FeeDisplay {
    fn default() -> Self {
        Self::cleared()
    }
}

/// `about <N> minutes`, using the classified tier's minute count
pub fn settlement_text(minutes: u32) -> String {
    format!("about {} minutes", minutes)
}

// =============================================================================
// Session Boundary
// =============================================================================

/// Caller-supplied data for opening a custom fee session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeSessionInit {
    #[serde(alias = "size", alias = "gas_limit")]
    pub reference_computation_size: u64,
    #[serde(alias = "fee_rate_max")]
    pub price_ceiling: Decimal,
    #[serde(alias = "now_rate")]
    pub current_price: Decimal,
    pub schedule: FeeSchedule,
}

/// Emitted once when the user confirms a valid custom fee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomFeeEvent {
    pub price: String,
    pub limit: String,
    pub computed_fee: FeeSummary,
    pub display: FeeDisplay,
}

/// Everything the form needs to render after a change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub input: CustomFeeInput,
    pub validation: ValidationResult,
    pub computed_fee: Option<ComputedFee>,
    pub display: FeeDisplay,
    pub submit_enabled: bool,
    pub messages: Vec<String>,
    pub closed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn tier(fee: &str, minutes: u32) -> FeeTier {
        FeeTier::new(dec("1"), dec(fee), dec("0.05"), minutes)
    }

    #[test]
    fn test_tier_from_bridge_json() {
        let json = r#"{"gas_price": 86, "time": 1, "gas_limit": 40000, "fee": "0.00344", "fiat": "4.71 USD"}"#;
        let tier: FeeTier = serde_json::from_str(json).unwrap();
        assert_eq!(tier.fee_rate, dec("86"));
        assert_eq!(tier.fee_amount, dec("0.00344"));
        assert_eq!(tier.fiat_amount, dec("4.71"));
        assert_eq!(tier.settlement_minutes, 1);
    }

    #[test]
    fn test_tier_numeric_fiat() {
        let json = r#"{"fee_rate": "1", "fee_amount": "0.000000021", "fiat_amount": 0.5, "settlement_minutes": 2}"#;
        let tier: FeeTier = serde_json::from_str(json).unwrap();
        assert_eq!(tier.fiat_amount, dec("0.5"));
    }

    #[test]
    fn test_schedule_ignores_extra_tiers() {
        let json = r#"{
            "rapid": {"gas_price": 87, "time": 0.25, "fee": "0.00348", "fiat": "4.77 USD"},
            "fast": {"gas_price": 86, "time": 1, "fee": "0.00344", "fiat": "4.71 USD"},
            "normal": {"gas_price": 79, "time": 3, "fee": "0.00316", "fiat": "4.33 USD"},
            "slow": {"gas_price": 72, "time": 10, "fee": "0.00288", "fiat": "3.95 USD"}
        }"#;
        let schedule: FeeSchedule = serde_json::from_str(json).unwrap();
        assert_eq!(schedule.tier(FeeTierKind::Slow).settlement_minutes, 10);
        assert!(schedule.check_ordering().is_ok());
    }

    #[test]
    fn test_check_ordering_reports_inversion() {
        let schedule = FeeSchedule::new(tier("0.001", 1), tier("0.002", 3), tier("0.0005", 10));
        let err = schedule.check_ordering().unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::UnorderedSchedule);
        assert!(err.details.unwrap().contains("normal=0.002"));
    }

    #[test]
    fn test_bounds_from_settings() {
        let bounds = FeeBounds::new(&FeeSettings::default(), 21000, dec("5")).unwrap();
        assert_eq!(bounds.price_min, dec("0.4"));
        assert_eq!(bounds.price_max, dec("5"));
        assert_eq!(bounds.limit_min, 21000);
        assert_eq!(bounds.limit_max, 210000);
    }

    #[test]
    fn test_bounds_reject_bad_input() {
        let settings = FeeSettings::default();
        assert!(FeeBounds::new(&settings, 0, dec("5")).is_err());
        assert!(FeeBounds::new(&settings, 21000, dec("-1")).is_err());
        let err = FeeBounds::new(&settings, u64::MAX, dec("5")).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::AmountOverflow);
    }

    #[test]
    fn test_range_violation_messages() {
        let price = RangeViolation {
            field: Field::Price,
            value: "0.3".to_string(),
            min: "0.4".to_string(),
            max: "5".to_string(),
        };
        assert_eq!(price.message(), "Gas price must be between 0.4 and 5");

        let limit = RangeViolation {
            field: Field::Limit,
            value: "210001".to_string(),
            min: "21000".to_string(),
            max: "210000".to_string(),
        };
        assert_eq!(limit.message(), "Gas limit must be between 21000 and 210000");
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome: ValidationOutcome<u64> = ValidationOutcome::Incomplete;
        assert_eq!(serde_json::to_string(&outcome).unwrap(), r#"{"status":"incomplete"}"#);
        assert!(outcome.message().is_none());
    }

    #[test]
    fn test_display_cleared_and_filled() {
        assert!(FeeDisplay::cleared().is_cleared());

        let fee = ComputedFee {
            native_amount: dec("0.000021"),
            fiat_amount: dec("50"),
            tier: FeeTierKind::Fast,
            settlement_minutes: 1,
        };
        let display = FeeDisplay::for_fee(&fee, &FeeSettings::default());
        assert_eq!(display.native_text, "0.000021 ETH");
        assert_eq!(display.fiat_text.as_deref(), Some("≈ $ 50"));
        assert_eq!(display.settlement_text, "about 1 minutes");
        assert!(!display.is_cleared());
    }

    #[test]
    fn test_input_get_set() {
        let mut input = CustomFeeInput::default();
        input.set(Field::Limit, "21000");
        assert_eq!(input.get(Field::Limit), "21000");
        assert_eq!(input.get(Field::Price), "");
    }
}
