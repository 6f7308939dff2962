//! Explicit per-session booking context
//!
//! One [`BookingSession`] exists per user session. It owns the draft and the
//! gate and carries the locale, display currency, rules and clock that the
//! calculator, validator and gate would otherwise pull from ambient state.
//! Dropping the session discards everything; nothing is persisted before a
//! submission succeeds.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::sync::{Arc, Mutex, PoisonError};

use core_kernel::{Currency, ExchangeRates, Localizer, SessionId};
use domain_pricing::{CarSummary, PriceBreakdown, PriceCalculator, QuoteSummary};
use crate::challenge::{ChallengeCallbacks, ChallengeToken, ChallengeWidget, WidgetInstance};
use crate::draft::BookingDraft;
use crate::error::{BookingError, GateError};
use crate::gate::{GateState, SubmissionGate};
use crate::rules::BookingRules;
use crate::submission::{BookingReceipt, BookingSubmission, BookingTransport};
use crate::validation::{BookingValidator, ValidationResult};

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Calendar date used for "not in the past" checks, in UTC
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now) }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Settings and collaborators fixed for the lifetime of a session
pub struct SessionContext {
    pub session_id: SessionId,
    pub localizer: Localizer,
    pub display_currency: Currency,
    pub rates: ExchangeRates,
    pub rules: BookingRules,
    pub calculator: PriceCalculator,
    pub clock: Arc<dyn Clock>,
}

impl SessionContext {
    /// Prices in the base currency of `rates`, on the system clock
    pub fn new(
        localizer: Localizer,
        display_currency: Currency,
        rates: ExchangeRates,
        rules: BookingRules,
    ) -> Self {
        Self {
            session_id: SessionId::new(),
            localizer,
            display_currency,
            calculator: PriceCalculator::new(rates.base()),
            rates,
            rules,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

/// A user's booking in progress
pub struct BookingSession {
    context: SessionContext,
    car: Option<CarSummary>,
    draft: BookingDraft,
    gate: SubmissionGate,
    widget: Box<dyn ChallengeWidget>,
}

impl BookingSession {
    pub fn new(context: SessionContext, widget: Box<dyn ChallengeWidget>) -> Self {
        let gate = SubmissionGate::new(context.rules.challenge_token_ttl());
        tracing::debug!(session_id = %context.session_id.short(), "booking session started");
        Self {
            context,
            car: None,
            draft: BookingDraft::default(),
            gate,
            widget,
        }
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn car(&self) -> Option<&CarSummary> {
        self.car.as_ref()
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn gate(&self) -> &SubmissionGate {
        &self.gate
    }

    pub fn gate_state(&self) -> GateState {
        self.gate.state()
    }

    /// Chooses the car; counts as an edit
    pub fn select_car(&mut self, car: CarSummary) -> Result<(), BookingError> {
        self.leave_challenge()?;
        self.car = Some(car);
        Ok(())
    }

    /// Applies a change to the draft
    ///
    /// Past `Editing`, the gate first returns to `Editing` and any challenge
    /// token is discarded. Refused, with the draft untouched, while a
    /// submission is in flight.
    pub fn edit<F>(&mut self, change: F) -> Result<(), BookingError>
    where
        F: FnOnce(&mut BookingDraft),
    {
        self.leave_challenge()?;
        change(&mut self.draft);
        Ok(())
    }

    /// Live quote for the current car and draft, in the base currency
    pub fn quote(&self) -> PriceBreakdown {
        let request = self.draft.quote_request(self.car.as_ref());
        self.context.calculator.compute_quote(request.as_ref())
    }

    /// Live quote rendered in the session's currency and locale
    pub fn quote_summary(&self) -> Result<QuoteSummary, BookingError> {
        Ok(QuoteSummary::present(
            &self.quote(),
            &self.context.rates,
            self.context.display_currency,
            &self.context.localizer,
        )?)
    }

    /// Validates the selected car and the draft without touching the gate
    pub fn check(&self) -> ValidationResult {
        BookingValidator::new(&self.context.rules).validate_booking(
            self.car.as_ref(),
            &self.draft,
            self.context.clock.today(),
        )
    }

    /// Validates the draft and, when it is valid, shows the challenge widget
    pub fn validate(&mut self) -> Result<ValidationResult, BookingError> {
        let result = self.check();
        if self.gate.record_validation(&result)? == GateState::ChallengePending {
            self.widget.show(self.gate.widget_instance());
        }
        Ok(result)
    }

    /// Shows a fresh widget after a challenge error or expiry
    pub fn retry_challenge(&mut self) -> Result<WidgetInstance, BookingError> {
        let instance = self.gate.retry_challenge()?;
        self.widget.show(instance);
        Ok(instance)
    }

    /// Sends the booking to the intake collaborator
    ///
    /// On success the draft, car and gate are reset. On a transport failure
    /// the gate enters `Failed` and the error is returned; see [`Self::retry`].
    pub async fn submit<T>(&mut self, transport: &T) -> Result<BookingReceipt, BookingError>
    where
        T: BookingTransport + ?Sized,
    {
        let Some(car) = self.car.clone() else {
            return Err(BookingError::NoCarSelected);
        };
        let price = self.quote();

        let token = match self.gate.begin_submission(self.context.clock.now()) {
            Ok(token) => token,
            Err(GateError::TokenExpired) => {
                self.widget.show(self.gate.widget_instance());
                return Err(GateError::TokenExpired.into());
            }
            Err(e) => return Err(e.into()),
        };

        let submission = match BookingSubmission::assemble(
            self.context.session_id,
            &car,
            &self.draft,
            price,
            token,
        ) {
            Ok(submission) => submission,
            Err(e) => {
                self.gate.submission_failed(e.to_string())?;
                return Err(e);
            }
        };

        match transport.submit(&submission).await {
            Ok(receipt) => {
                self.gate.submission_succeeded()?;
                self.draft = BookingDraft::default();
                self.car = None;
                tracing::info!(
                    session_id = %self.context.session_id.short(),
                    booking_id = %receipt.booking_id,
                    "booking submitted"
                );
                Ok(receipt)
            }
            Err(e) => {
                tracing::warn!(
                    session_id = %self.context.session_id.short(),
                    kind = e.kind(),
                    transient = e.is_transient(),
                    "booking submission failed"
                );
                self.gate.submission_failed(e.to_string())?;
                Err(e.into())
            }
        }
    }

    /// Leaves `Failed` after a transport failure
    ///
    /// Returns `ChallengeVerified` when the token is still live, otherwise
    /// `Editing`, after which the draft must be validated and challenged again.
    pub fn retry(&mut self) -> Result<GateState, BookingError> {
        Ok(self.gate.retry(self.context.clock.now())?)
    }

    fn leave_challenge(&mut self) -> Result<(), GateError> {
        let showing = matches!(
            self.gate.state(),
            GateState::ChallengePending | GateState::ChallengeVerified
        );
        self.gate.edit()?;
        if showing {
            self.widget.hide();
        }
        Ok(())
    }
}

impl ChallengeCallbacks for BookingSession {
    fn on_verify(&mut self, token: ChallengeToken) -> Result<GateState, GateError> {
        self.gate.on_verify(token)
    }

    fn on_error(&mut self) -> Result<GateState, GateError> {
        self.gate.on_error()
    }

    fn on_expire(&mut self) -> Result<GateState, GateError> {
        self.gate.on_expire()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::HeadlessWidget;
    use rust_decimal_macros::dec;
    use core_kernel::{CarId, Money};

    fn session() -> BookingSession {
        let context = SessionContext::new(
            Localizer::negotiate(&["en-US"]).unwrap(),
            Currency::EUR,
            ExchangeRates::new(Currency::EUR),
            BookingRules::default(),
        );
        BookingSession::new(context, Box::new(HeadlessWidget))
    }

    #[test]
    fn test_quote_is_zero_without_car() {
        let session = session();
        assert!(session.quote().is_zero());
    }

    #[test]
    fn test_quote_follows_edits() {
        let mut session = session();
        session
            .select_car(CarSummary {
                id: CarId::new(),
                name: "Fiat Panda".to_string(),
                daily_rate: Money::new(dec!(30), Currency::EUR),
            })
            .unwrap();
        session
            .edit(|draft| {
                draft.pickup_date = NaiveDate::from_ymd_opt(2030, 5, 1);
                draft.return_date = NaiveDate::from_ymd_opt(2030, 5, 3);
            })
            .unwrap();
        assert_eq!(session.quote().total.amount(), dec!(60));

        session.edit(|draft| draft.insurance = Some(domain_pricing::InsuranceTier::Basic)).unwrap();
        assert_eq!(session.quote().total.amount(), dec!(70));
    }

    #[test]
    fn test_fixed_clock_advances() {
        let start = Utc::now();
        let clock = FixedClock::new(start);
        clock.advance(Duration::seconds(30));
        assert_eq!(clock.now(), start + Duration::seconds(30));
        clock.set(start);
        assert_eq!(clock.now(), start);
    }
}
