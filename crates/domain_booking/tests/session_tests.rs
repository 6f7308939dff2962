//! Booking session tests
//!
//! # Test Organization
//!
//! - `quote_tests` - live quote as the draft changes
//! - `flow_tests` - validate, challenge and submit end to end
//! - `failure_tests` - transport failures and retries

use chrono::Duration;
use std::sync::Arc;

use core_kernel::{Currency, PortError};
use domain_booking::{
    BookingDraft, BookingError, BookingField, BookingSession, ChallengeCallbacks, ChallengeToken,
    Clock, FieldError, FixedClock, GateError, GateState,
};
use domain_pricing::{AddOnService, InsuranceTier};
use rust_decimal_macros::dec;
use test_utils::{
    assert_breakdown_consistent, CarFixtures, DateFixtures, DraftBuilder, InMemoryTransport,
    RecordingWidget, SessionBuilder, WidgetEvent,
};

struct Harness {
    session: BookingSession,
    clock: Arc<FixedClock>,
    widget: RecordingWidget,
}

fn harness() -> Harness {
    let clock = Arc::new(FixedClock::new(DateFixtures::now()));
    let widget = RecordingWidget::default();
    let session = SessionBuilder::new()
        .with_clock(clock.clone())
        .with_widget(widget.clone())
        .build();
    Harness { session, clock, widget }
}

fn fill(session: &mut BookingSession, draft: BookingDraft) {
    session.select_car(CarFixtures::economy()).unwrap();
    session.edit(|current| *current = draft).unwrap();
}

/// Drives a session to `ChallengeVerified`
fn verified() -> Harness {
    let mut h = harness();
    fill(&mut h.session, DraftBuilder::new().build());
    assert!(h.session.validate().unwrap().is_valid());
    h.session
        .on_verify(ChallengeToken::new("human-ok", h.clock.now()))
        .unwrap();
    h
}

// ============================================================================
// QUOTE TESTS
// ============================================================================

mod quote_tests {
    use super::*;

    #[test]
    fn test_worked_example_through_session() {
        let mut h = harness();
        fill(
            &mut h.session,
            DraftBuilder::new()
                .with_dates(DateFixtures::pickup(), DateFixtures::return_after(3))
                .with_insurance(Some(InsuranceTier::Full))
                .with_service(AddOnService::Wifi)
                .with_service(AddOnService::AirportPickup)
                .build(),
        );

        let quote = h.session.quote();
        assert_eq!(quote.total.amount(), dec!(166));
        assert_breakdown_consistent(&quote);

        let summary = h.session.quote_summary().unwrap();
        assert_eq!(summary.total_formatted, "€ 166.00");
    }

    #[test]
    fn test_quote_in_display_currency() {
        let mut session = SessionBuilder::new()
            .with_display_currency(Currency::USD)
            .with_locale("de-DE")
            .build();
        fill(&mut session, DraftBuilder::new().with_insurance(None).build());

        // 30 × 3 = 90 EUR → 97.20 USD
        let summary = session.quote_summary().unwrap();
        assert_eq!(summary.currency, Currency::USD);
        assert_eq!(summary.total.amount(), dec!(97.20));
        assert_eq!(summary.lines.len(), 1);
    }

    #[test]
    fn test_incomplete_draft_quotes_zero() {
        let mut h = harness();
        h.session.select_car(CarFixtures::economy()).unwrap();
        assert!(h.session.quote().is_zero());

        h.session
            .edit(|draft| {
                draft.pickup_date = Some(DateFixtures::pickup());
                draft.return_date = Some(DateFixtures::pickup());
            })
            .unwrap();
        assert!(h.session.quote().is_zero());
    }
}

// ============================================================================
// FLOW TESTS
// ============================================================================

mod flow_tests {
    use super::*;

    #[test]
    fn test_invalid_draft_stays_editing() {
        let mut h = harness();
        fill(&mut h.session, DraftBuilder::new().with_email("not-an-email").build());

        let result = h.session.validate().unwrap();
        assert!(!result.is_valid());
        assert_eq!(h.session.gate_state(), GateState::Editing);
        assert!(h.widget.events().is_empty());
    }

    #[test]
    fn test_valid_draft_shows_widget() {
        let mut h = harness();
        fill(&mut h.session, DraftBuilder::new().build());

        h.session.validate().unwrap();
        assert_eq!(h.session.gate_state(), GateState::ChallengePending);
        assert_eq!(h.widget.shown_count(), 1);
    }

    #[test]
    fn test_retry_challenge_shows_new_instance() {
        let mut h = harness();
        fill(&mut h.session, DraftBuilder::new().build());
        h.session.validate().unwrap();
        let first = h.widget.last_shown().unwrap();

        h.session.on_error().unwrap();
        let second = h.session.retry_challenge().unwrap();
        assert!(second > first);
        assert_eq!(h.widget.last_shown(), Some(second));
    }

    #[test]
    fn test_edit_after_verification_requires_new_challenge() {
        let mut h = verified();
        h.session
            .edit(|draft| {
                draft.add_on_services.insert(AddOnService::Gps);
            })
            .unwrap();

        assert_eq!(h.session.gate_state(), GateState::Editing);
        assert!(h.session.gate().token().is_none());
        assert_eq!(h.widget.events().last(), Some(&WidgetEvent::Hidden));
    }

    #[tokio::test]
    async fn test_submit_without_challenge_is_refused() {
        let mut h = harness();
        fill(&mut h.session, DraftBuilder::new().build());
        let transport = InMemoryTransport::new();

        let err = h.session.submit(&transport).await.unwrap_err();
        assert!(matches!(err, BookingError::Gate(GateError::InvalidTransition { .. })));
        assert_eq!(transport.submission_count(), 0);
    }

    #[tokio::test]
    async fn test_successful_submission_resets_session() {
        let mut h = verified();
        let transport = InMemoryTransport::new();

        let receipt = h.session.submit(&transport).await.unwrap();
        assert_eq!(receipt.reference, "RB-000001");
        assert_eq!(h.session.gate_state(), GateState::Editing);
        assert_eq!(h.session.draft(), &BookingDraft::default());
        assert!(h.session.car().is_none());

        let sent = transport.submissions();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].car_id, CarFixtures::economy_id());
        assert_eq!(sent[0].challenge_token.value(), "human-ok");
        assert_eq!(sent[0].insurance_tier, InsuranceTier::Basic);
        assert_eq!(sent[0].session_id, h.session.context().session_id);
        assert_breakdown_consistent(&sent[0].price);
    }

    #[tokio::test]
    async fn test_submit_with_expired_token_rechallenges() {
        let mut h = verified();
        let transport = InMemoryTransport::new();
        h.clock.advance(Duration::minutes(6));

        let err = h.session.submit(&transport).await.unwrap_err();
        assert!(matches!(err, BookingError::Gate(GateError::TokenExpired)));
        assert_eq!(h.session.gate_state(), GateState::ChallengePending);
        assert_eq!(h.widget.shown_count(), 2);
        assert_eq!(transport.submission_count(), 0);
    }

    #[test]
    fn test_validate_without_car_does_not_challenge() {
        let mut h = harness();
        h.session.edit(|draft| *draft = DraftBuilder::new().build()).unwrap();

        let result = h.session.validate().unwrap();
        assert_eq!(
            result.errors().and_then(|errors| errors.get(BookingField::Car)),
            Some(FieldError::CarNotSelected)
        );
        assert_eq!(h.session.gate_state(), GateState::Editing);
        assert!(h.widget.events().is_empty());

        h.session.select_car(CarFixtures::economy()).unwrap();
        assert!(h.session.validate().unwrap().is_valid());
        assert_eq!(h.session.gate_state(), GateState::ChallengePending);
    }

    #[tokio::test]
    async fn test_submit_without_car() {
        let transport = InMemoryTransport::new();
        let mut session = SessionBuilder::new().build();
        session.edit(|draft| *draft = DraftBuilder::new().build()).unwrap();
        let err = session.submit(&transport).await.unwrap_err();
        assert!(matches!(err, BookingError::NoCarSelected));
    }
}

// ============================================================================
// FAILURE TESTS
// ============================================================================

mod failure_tests {
    use super::*;

    #[tokio::test]
    async fn test_transport_failure_then_retry_with_live_token() {
        let mut h = verified();
        let transport = InMemoryTransport::new();
        transport.fail_next(PortError::ServiceUnavailable {
            service: "booking-intake".to_string(),
        });

        let err = h.session.submit(&transport).await.unwrap_err();
        assert!(err.is_transient());
        assert_eq!(h.session.gate_state(), GateState::Failed);
        assert!(h.session.gate().last_failure().is_some());
        // draft survives the failure
        assert_ne!(h.session.draft(), &BookingDraft::default());

        assert_eq!(h.session.retry().unwrap(), GateState::ChallengeVerified);
        h.session.submit(&transport).await.unwrap();
        assert_eq!(transport.submission_count(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_then_retry_with_expired_token() {
        let mut h = verified();
        let transport = InMemoryTransport::new();
        transport.fail_next(PortError::rejected("duplicate booking"));

        let err = h.session.submit(&transport).await.unwrap_err();
        assert!(!err.is_transient());

        h.clock.advance(Duration::minutes(10));
        assert_eq!(h.session.retry().unwrap(), GateState::Editing);

        // full cycle again
        h.session.validate().unwrap();
        h.session
            .on_verify(ChallengeToken::new("human-ok-2", h.clock.now()))
            .unwrap();
        h.session.submit(&transport).await.unwrap();
        assert_eq!(transport.submissions()[0].challenge_token.value(), "human-ok-2");
    }

    #[tokio::test]
    async fn test_edit_while_failed_returns_to_editing() {
        let mut h = verified();
        let transport = InMemoryTransport::new();
        transport.fail_next(PortError::connection("reset by peer"));
        let _ = h.session.submit(&transport).await;

        h.session
            .edit(|draft| draft.customer.phone = "+30 210 765 4321".to_string())
            .unwrap();
        assert_eq!(h.session.gate_state(), GateState::Editing);
        assert!(h.session.gate().token().is_none());
    }
}
