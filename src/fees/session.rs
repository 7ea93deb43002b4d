//! Custom fee form session
//!
//! Owns the state of one open custom fee form: the schedule and bounds
//! captured at open time, the text in both fields, and everything derived
//! from them. Re-evaluated synchronously on every keystroke.

use super::amount::{format_plain, integer_part, parse_decimal, parse_integer, AmountParseError};
use super::config::FeeSettings;
use super::estimator::{compute_fee, validate_limit, validate_price};
use super::types::*;
use crate::error::FeeResult;
use crate::utils::logging::{LogEntry, LogLevel};
use crate::{log_debug, log_error, log_info, log_warn};
use rust_decimal::Decimal;

const LOG_MODULE: &str = "fees::session";

/// State of one custom fee form
#[derive(Debug, Clone)]
pub struct CustomFeeSession {
    settings: FeeSettings,
    schedule: FeeSchedule,
    bounds: FeeBounds,
    input: CustomFeeInput,
    validation: ValidationResult,
    computed: Option<ComputedFee>,
    display: FeeDisplay,
    submit_enabled: bool,
    notices: Vec<RangeViolation>,
    closed: bool,
}

impl CustomFeeSession {
    /// Open a session with the fields pre-filled
    ///
    /// The limit starts at the reference size and the price at the whole
    /// part of the current network price.
    pub fn open(init: FeeSessionInit, settings: FeeSettings) -> FeeResult<Self> {
        let input = CustomFeeInput {
            price: integer_part(init.current_price),
            limit: init.reference_computation_size.to_string(),
        };
        Self::open_with_input(init, settings, input)
    }

    /// Open a session with caller-chosen field text
    pub fn open_with_input(
        init: FeeSessionInit,
        settings: FeeSettings,
        input: CustomFeeInput,
    ) -> FeeResult<Self> {
        settings.validate()?;
        let bounds = FeeBounds::new(&settings, init.reference_computation_size, init.price_ceiling)?;

        if let Err(e) = init.schedule.check_ordering() {
            log_warn!(LOG_MODULE, "Fee schedule is not monotonic, tier estimates may be wrong",
                error = e);
        }
        if bounds.price_max < bounds.price_min {
            log_warn!(LOG_MODULE, "Price ceiling is below the floor, no price can be accepted",
                floor = bounds.price_min, ceiling = bounds.price_max);
        }

        let mut session = Self {
            settings,
            schedule: init.schedule,
            bounds,
            input,
            validation: ValidationResult::default(),
            computed: None,
            display: FeeDisplay::cleared(),
            submit_enabled: false,
            notices: Vec::new(),
            closed: false,
        };
        session.evaluate();
        Ok(session)
    }

    /// Apply new text for one field and re-derive everything
    ///
    /// Returns the range notices to show for this change, if any.
    pub fn on_input_changed(&mut self, field: Field, text: &str) -> &[RangeViolation] {
        if self.closed {
            log_debug!(LOG_MODULE, "Ignoring input on closed session");
            return &[];
        }

        LogEntry::new(LogLevel::Debug, LOG_MODULE, "Field changed")
            .field("field", field)
            .input_field("text", text)
            .log();

        self.input.set(field, text);
        self.evaluate();
        &self.notices
    }

    /// Confirm the current input
    ///
    /// Both fields are validated again; the event is emitted only when they
    /// pass, after which the session is closed.
    pub fn on_submit(&mut self) -> Option<CustomFeeEvent> {
        if self.closed {
            return None;
        }

        let price = validate_price(&self.input.price, &self.bounds);
        let limit = validate_limit(&self.input.limit, &self.bounds);
        self.validation = ValidationResult {
            price_valid: price.is_valid(),
            limit_valid: limit.is_valid(),
        };
        self.notices = [price.violation(), limit.violation()]
            .into_iter()
            .flatten()
            .cloned()
            .collect();

        let (Some(&price_value), Some(&limit_value)) = (price.value(), limit.value()) else {
            self.submit_enabled = false;
            return None;
        };

        let fee = match compute_fee(price_value, limit_value, &self.schedule, &self.settings) {
            Ok(fee) => fee,
            Err(e) => {
                log_error!(LOG_MODULE, "Fee computation failed on submit", error = e);
                self.clear_derived();
                return None;
            }
        };

        let display = FeeDisplay::for_fee(&fee, &self.settings);
        let event = CustomFeeEvent {
            price: format_plain(price_value),
            limit: limit_value.to_string(),
            computed_fee: fee.summary(),
            display: display.clone(),
        };

        log_info!(LOG_MODULE, "Custom fee confirmed",
            native = event.computed_fee.native,
            tier = fee.tier,
            limit = limit_value);

        self.computed = Some(fee);
        self.display = display;
        self.submit_enabled = false;
        self.closed = true;
        Some(event)
    }

    /// Close without emitting anything
    pub fn cancel(&mut self) {
        self.closed = true;
        self.submit_enabled = false;
    }

    fn evaluate(&mut self) {
        self.notices.clear();

        // Zero or unreadable text in either field means the user is still typing.
        // Numbers too large to represent are real input and get a range notice.
        let price_ready = match parse_decimal(&self.input.price) {
            Ok(price) => price > Decimal::ZERO,
            Err(e) => matches!(e, AmountParseError::Overflow(_)),
        };
        let limit_ready = match parse_integer(&self.input.limit) {
            Ok(limit) => limit > 0,
            Err(e) => matches!(e, AmountParseError::Overflow(_)),
        };

        let price = validate_price(&self.input.price, &self.bounds);
        let limit = validate_limit(&self.input.limit, &self.bounds);
        self.validation = ValidationResult {
            price_valid: price.is_valid(),
            limit_valid: limit.is_valid(),
        };

        if !(price_ready && limit_ready) {
            self.clear_derived();
            return;
        }

        self.notices.extend(price.violation().cloned());
        self.notices.extend(limit.violation().cloned());

        match (price.value(), limit.value()) {
            (Some(&price_value), Some(&limit_value)) => {
                match compute_fee(price_value, limit_value, &self.schedule, &self.settings) {
                    Ok(fee) => {
                        log_debug!(LOG_MODULE, "Recomputed custom fee",
                            native = fee.native_text(),
                            fiat = fee.fiat_text(),
                            tier = fee.tier);
                        self.display = FeeDisplay::for_fee(&fee, &self.settings);
                        self.computed = Some(fee);
                        self.submit_enabled = true;
                    }
                    Err(e) => {
                        log_error!(LOG_MODULE, "Fee computation failed", error = e);
                        self.clear_derived();
                    }
                }
            }
            (None, None) => self.clear_derived(),
            // One field out of range: keep the last preview, block submission
            _ => self.submit_enabled = false,
        }
    }

    fn clear_derived(&mut self) {
        self.computed = None;
        self.display = FeeDisplay::cleared();
        self.submit_enabled = false;
    }

    pub fn settings(&self) -> &FeeSettings {
        &self.settings
    }

    pub fn schedule(&self) -> &FeeSchedule {
        &self.schedule
    }

    pub fn bounds(&self) -> &FeeBounds {
        &self.bounds
    }

    pub fn input(&self) -> &CustomFeeInput {
        &self.input
    }

    pub fn validation(&self) -> ValidationResult {
        self.validation
    }

    pub fn computed_fee(&self) -> Option<&ComputedFee> {
        self.computed.as_ref()
    }

    pub fn display(&self) -> &FeeDisplay {
        &self.display
    }

    pub fn can_submit(&self) -> bool {
        self.submit_enabled && !self.closed
    }

    pub fn notices(&self) -> &[RangeViolation] {
        &self.notices
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            input: self.input.clone(),
            validation: self.validation,
            computed_fee: self.computed.clone(),
            display: self.display.clone(),
            submit_enabled: self.can_submit(),
            messages: self.notices.iter().map(RangeViolation::message).collect(),
            closed: self.closed,
        }
    }
}
