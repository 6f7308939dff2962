//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! [`DraftBuilder`] starts from a draft that passes validation against
//! [`DateFixtures::today`], so tests only spell out the fields they break.

use chrono::NaiveDate;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use std::sync::Arc;

use core_kernel::{Currency, ExchangeRates, Localizer};
use domain_booking::{
    BookingDraft, BookingRules, BookingSession, Clock, DocumentRef, FixedClock, SessionContext,
};
use domain_pricing::{AddOnService, InsuranceTier};

use crate::doubles::RecordingWidget;
use crate::fixtures::{DateFixtures, DocumentFixtures, RateFixtures};

/// Builder for booking drafts
pub struct DraftBuilder {
    draft: BookingDraft,
}

impl Default for DraftBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DraftBuilder {
    /// Creates a builder for a complete, valid draft with a generated customer
    pub fn new() -> Self {
        let mut draft = BookingDraft::default();
        draft.customer.name = Name().fake();
        draft.customer.email = SafeEmail().fake();
        draft.customer.phone = "+30 210 123 4567".to_string();
        draft.customer.license = "GR-7734519".to_string();
        draft.address.street = "Odos Ermou 12".to_string();
        draft.address.city = "Athens".to_string();
        draft.address.postal_code = Some("105 63".to_string());
        draft.address.country = "Greece".to_string();
        draft.pickup_date = Some(DateFixtures::pickup());
        draft.return_date = Some(DateFixtures::return_after(3));
        draft.pickup_location = "airport".to_string();
        draft.return_location = "airport".to_string();
        draft.insurance = Some(InsuranceTier::Basic);
        draft.id_document = Some(DocumentFixtures::id_card());
        draft.passport_document = Some(DocumentFixtures::passport());
        draft.age_confirmed = true;
        Self { draft }
    }

    /// Starts from an untouched form
    pub fn empty() -> Self {
        Self {
            draft: BookingDraft::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.draft.customer.name = name.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.draft.customer.email = email.into();
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.draft.customer.phone = phone.into();
        self
    }

    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.draft.customer.license = license.into();
        self
    }

    pub fn with_postal_code(mut self, postal_code: Option<&str>) -> Self {
        self.draft.address.postal_code = postal_code.map(String::from);
        self
    }

    pub fn with_dates(mut self, pickup: NaiveDate, return_date: NaiveDate) -> Self {
        self.draft.pickup_date = Some(pickup);
        self.draft.return_date = Some(return_date);
        self
    }

    pub fn with_pickup_date(mut self, pickup: Option<NaiveDate>) -> Self {
        self.draft.pickup_date = pickup;
        self
    }

    pub fn with_return_date(mut self, return_date: Option<NaiveDate>) -> Self {
        self.draft.return_date = return_date;
        self
    }

    pub fn with_locations(mut self, pickup: &str, return_location: &str) -> Self {
        self.draft.pickup_location = pickup.to_string();
        self.draft.return_location = return_location.to_string();
        self
    }

    pub fn with_insurance(mut self, tier: Option<InsuranceTier>) -> Self {
        self.draft.insurance = tier;
        self
    }

    pub fn with_service(mut self, service: AddOnService) -> Self {
        self.draft.add_on_services.insert(service);
        self
    }

    pub fn with_id_document(mut self, document: Option<DocumentRef>) -> Self {
        self.draft.id_document = document;
        self
    }

    pub fn with_passport_document(mut self, document: Option<DocumentRef>) -> Self {
        self.draft.passport_document = document;
        self
    }

    pub fn with_age_confirmed(mut self, confirmed: bool) -> Self {
        self.draft.age_confirmed = confirmed;
        self
    }

    pub fn build(self) -> BookingDraft {
        self.draft
    }
}

/// Builder for booking sessions on a controllable clock
pub struct SessionBuilder {
    locales: Vec<String>,
    display_currency: Currency,
    rates: ExchangeRates,
    rules: BookingRules,
    clock: Arc<FixedClock>,
    widget: RecordingWidget,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionBuilder {
    /// English, EUR display, default rules, clock at [`DateFixtures::now`]
    pub fn new() -> Self {
        Self {
            locales: vec!["en-US".to_string()],
            display_currency: Currency::EUR,
            rates: RateFixtures::eur_base(),
            rules: BookingRules::default(),
            clock: Arc::new(FixedClock::new(DateFixtures::now())),
            widget: RecordingWidget::default(),
        }
    }

    pub fn with_locale(mut self, locale: &str) -> Self {
        self.locales = vec![locale.to_string()];
        self
    }

    pub fn with_display_currency(mut self, currency: Currency) -> Self {
        self.display_currency = currency;
        self
    }

    pub fn with_rules(mut self, rules: BookingRules) -> Self {
        self.rules = rules;
        self
    }

    /// Shares a clock the test can advance
    pub fn with_clock(mut self, clock: Arc<FixedClock>) -> Self {
        self.clock = clock;
        self
    }

    /// Shares a widget whose log the test can inspect
    pub fn with_widget(mut self, widget: RecordingWidget) -> Self {
        self.widget = widget;
        self
    }

    pub fn build(self) -> BookingSession {
        let localizer = Localizer::negotiate(&self.locales).unwrap();
        let clock: Arc<dyn Clock> = self.clock;
        let context = SessionContext::new(localizer, self.display_currency, self.rates, self.rules)
            .with_clock(clock);
        BookingSession::new(context, Box::new(self.widget))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_booking::BookingValidator;

    #[test]
    fn test_default_draft_is_valid() {
        let draft = DraftBuilder::new().build();
        let result = BookingValidator::new(&BookingRules::default()).validate(&draft, DateFixtures::today());
        assert!(result.is_valid(), "{:?}", result);
    }

    #[test]
    fn test_empty_draft_is_default() {
        assert_eq!(DraftBuilder::empty().build(), BookingDraft::default());
    }
}
