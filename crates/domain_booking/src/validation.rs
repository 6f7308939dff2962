//! Booking form validation
//!
//! Every rule runs on every call; a draft with several problems reports all
//! of them, keyed by field. The UI decides how many to show.
//!
//! # Rules
//!
//! ## Customer
//! - `name`: required, 2-100 characters
//! - `email`: required, `local@domain.tld`
//! - `phone`: required, optional leading `+`, digits, spaces, hyphens and
//!   parentheses, at least 8 digits
//! - `license`: required, 5-50 characters
//!
//! ## Address
//! - `street`, `country`: required, 2-200 characters
//! - `city`: required, 2-100 characters
//! - `area`, `postal_code`: optional, length-bounded
//!
//! ## Rental
//! - `pickup_date`: required, today or later
//! - `return_date`: required, strictly after `pickup_date`
//! - `pickup_location`, `return_location`: required, one of the allowed locations
//! - `insurance`: required
//! - `id_document`, `passport_document`: required, at most 5 MiB, JPEG/PNG/PDF
//! - `age_confirmed`: must be checked
//!
//! [`BookingValidator::validate_booking`] additionally reports `car` when no car
//! is selected, so a booking that cannot be submitted never reaches the
//! challenge.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::{Validate, ValidationErrors};

use core_kernel::{FluentArgs, Localizer};
use domain_pricing::CarSummary;
use crate::draft::{BookingDraft, BookingField, DocumentRef, MIN_PHONE_DIGITS};
use crate::rules::BookingRules;

/// Why a single field was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum FieldError {
    Required,
    TooShort { min: u64 },
    TooLong { max: u64 },
    InvalidEmail,
    InvalidPhone,
    DateInPast,
    ReturnNotAfterPickup,
    FileTooLarge { max_bytes: u64 },
    UnsupportedFileType,
    AgeNotConfirmed { minimum_age: u32 },
    UnknownLocation,
    CarNotSelected,
    Invalid,
}

impl FieldError {
    /// Renders the message shown next to the field
    pub fn message(&self, localizer: &Localizer) -> String {
        let mut args = FluentArgs::new();
        let id = match self {
            FieldError::Required => "field-required",
            FieldError::TooShort { min } => {
                args.set("min", *min);
                "field-too-short"
            }
            FieldError::TooLong { max } => {
                args.set("max", *max);
                "field-too-long"
            }
            FieldError::InvalidEmail => "field-invalid-email",
            FieldError::InvalidPhone => {
                args.set("min", MIN_PHONE_DIGITS);
                "field-invalid-phone"
            }
            FieldError::DateInPast => "field-date-in-past",
            FieldError::ReturnNotAfterPickup => "field-return-not-after-pickup",
            FieldError::FileTooLarge { max_bytes } => {
                args.set("max_mb", *max_bytes / (1024 * 1024));
                "field-file-too-large"
            }
            FieldError::UnsupportedFileType => "field-file-type",
            FieldError::AgeNotConfirmed { minimum_age } => {
                args.set("age", *minimum_age);
                "field-age-not-confirmed"
            }
            FieldError::UnknownLocation => "field-unknown-location",
            FieldError::CarNotSelected => "field-car-not-selected",
            FieldError::Invalid => "field-invalid",
        };
        localizer.format(id, Some(&args))
    }
}

/// Field errors of a rejected draft, ordered as the fields appear on the form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors(BTreeMap<BookingField, FieldError>);

impl FieldErrors {
    /// Records an error unless the field already has one
    pub(crate) fn add(&mut self, field: BookingField, error: FieldError) {
        self.0.entry(field).or_insert(error);
    }

    pub fn get(&self, field: BookingField) -> Option<FieldError> {
        self.0.get(&field).copied()
    }

    pub fn contains(&self, field: BookingField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The first error in form order
    pub fn first(&self) -> Option<(BookingField, FieldError)> {
        self.0.iter().next().map(|(field, error)| (*field, *error))
    }

    pub fn iter(&self) -> impl Iterator<Item = (BookingField, FieldError)> + '_ {
        self.0.iter().map(|(field, error)| (*field, *error))
    }

    /// Field name to localized message
    pub fn messages(&self, localizer: &Localizer) -> BTreeMap<String, String> {
        self.0
            .iter()
            .map(|(field, error)| (field.name().to_string(), error.message(localizer)))
            .collect()
    }
}

/// Outcome of validating a draft snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "errors", rename_all = "snake_case")]
pub enum ValidationResult {
    Valid,
    Invalid(FieldErrors),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn errors(&self) -> Option<&FieldErrors> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(errors) => Some(errors),
        }
    }
}

/// Validates booking drafts against a set of rules
///
/// # Examples
///
/// ```rust,ignore
/// let validator = BookingValidator::new(&rules);
/// match validator.validate(&draft, today) {
///     ValidationResult::Valid => gate.record_validation(..),
///     ValidationResult::Invalid(errors) => show(errors.messages(&localizer)),
/// }
/// ```
pub struct BookingValidator<'a> {
    rules: &'a BookingRules,
}

impl<'a> BookingValidator<'a> {
    pub fn new(rules: &'a BookingRules) -> Self {
        Self { rules }
    }

    /// Validates a draft together with the car it books
    pub fn validate_booking(
        &self,
        car: Option<&CarSummary>,
        draft: &BookingDraft,
        today: NaiveDate,
    ) -> ValidationResult {
        let result = self.validate(draft, today);
        if car.is_some() {
            return result;
        }

        let mut errors = match result {
            ValidationResult::Valid => FieldErrors::default(),
            ValidationResult::Invalid(errors) => errors,
        };
        errors.add(BookingField::Car, FieldError::CarNotSelected);
        tracing::debug!(error_count = errors.len(), "booking rejected, no car selected");
        ValidationResult::Invalid(errors)
    }

    /// Validates a draft as of `today`
    pub fn validate(&self, draft: &BookingDraft, today: NaiveDate) -> ValidationResult {
        let mut errors = FieldErrors::default();

        Self::validate_required_text(draft, &mut errors);
        if let Err(schema_errors) = draft.customer.validate() {
            Self::collect_schema_errors(draft, &schema_errors, &mut errors);
        }
        if let Err(schema_errors) = draft.address.validate() {
            Self::collect_schema_errors(draft, &schema_errors, &mut errors);
        }

        Self::validate_dates(draft, today, &mut errors);
        self.validate_locations(draft, &mut errors);

        if draft.insurance.is_none() {
            errors.add(BookingField::Insurance, FieldError::Required);
        }

        self.validate_document(BookingField::IdDocument, draft.id_document.as_ref(), &mut errors);
        self.validate_document(
            BookingField::PassportDocument,
            draft.passport_document.as_ref(),
            &mut errors,
        );

        if !draft.age_confirmed {
            errors.add(
                BookingField::AgeConfirmed,
                FieldError::AgeNotConfirmed {
                    minimum_age: self.rules.minimum_driver_age,
                },
            );
        }

        if errors.is_empty() {
            ValidationResult::Valid
        } else {
            tracing::debug!(error_count = errors.len(), "booking draft rejected");
            ValidationResult::Invalid(errors)
        }
    }

    // Blank required fields report `Required` rather than a length error.
    fn validate_required_text(draft: &BookingDraft, errors: &mut FieldErrors) {
        let required = [
            (BookingField::Name, &draft.customer.name),
            (BookingField::Email, &draft.customer.email),
            (BookingField::Phone, &draft.customer.phone),
            (BookingField::License, &draft.customer.license),
            (BookingField::Street, &draft.address.street),
            (BookingField::City, &draft.address.city),
            (BookingField::Country, &draft.address.country),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                errors.add(field, FieldError::Required);
            }
        }
    }

    fn collect_schema_errors(
        draft: &BookingDraft,
        schema_errors: &ValidationErrors,
        errors: &mut FieldErrors,
    ) {
        for (name, field_errors) in schema_errors.field_errors() {
            let name: &str = name.as_ref();
            let Some(field) = BookingField::from_name(name) else {
                continue;
            };
            let Some(first) = field_errors.first() else {
                continue;
            };
            let length = draft.text_value(field).map(|value| value.chars().count() as u64);
            errors.add(field, Self::map_schema_error(first, length));
        }
    }

    fn map_schema_error(error: &validator::ValidationError, length: Option<u64>) -> FieldError {
        match error.code.as_ref() {
            "length" => {
                let param = |key: &str| error.params.get(key).and_then(|v| v.as_u64());
                match (length, param("min"), param("max")) {
                    (Some(len), Some(min), _) if len < min => FieldError::TooShort { min },
                    (_, _, Some(max)) => FieldError::TooLong { max },
                    _ => FieldError::Invalid,
                }
            }
            "email" => FieldError::InvalidEmail,
            "phone" => FieldError::InvalidPhone,
            _ => FieldError::Invalid,
        }
    }

    fn validate_dates(draft: &BookingDraft, today: NaiveDate, errors: &mut FieldErrors) {
        match draft.pickup_date {
            None => errors.add(BookingField::PickupDate, FieldError::Required),
            Some(pickup) if pickup < today => {
                errors.add(BookingField::PickupDate, FieldError::DateInPast)
            }
            Some(_) => {}
        }

        match (draft.pickup_date, draft.return_date) {
            (_, None) => errors.add(BookingField::ReturnDate, FieldError::Required),
            (Some(pickup), Some(return_date)) if return_date <= pickup => {
                errors.add(BookingField::ReturnDate, FieldError::ReturnNotAfterPickup)
            }
            _ => {}
        }
    }

    fn validate_locations(&self, draft: &BookingDraft, errors: &mut FieldErrors) {
        let locations = [
            (BookingField::PickupLocation, &draft.pickup_location),
            (BookingField::ReturnLocation, &draft.return_location),
        ];
        for (field, location) in locations {
            if location.trim().is_empty() {
                errors.add(field, FieldError::Required);
            } else if !self.rules.is_allowed_location(location) {
                errors.add(field, FieldError::UnknownLocation);
            }
        }
    }

    fn validate_document(
        &self,
        field: BookingField,
        document: Option<&DocumentRef>,
        errors: &mut FieldErrors,
    ) {
        let Some(document) = document else {
            errors.add(field, FieldError::Required);
            return;
        };
        if document.size_bytes == 0 {
            errors.add(field, FieldError::Required);
        } else if document.size_bytes > self.rules.max_document_bytes {
            errors.add(
                field,
                FieldError::FileTooLarge {
                    max_bytes: self.rules.max_document_bytes,
                },
            );
        } else if !self.rules.is_allowed_document_type(&document.content_type) {
            errors.add(field, FieldError::UnsupportedFileType);
        }
    }
}
