//! The in-progress booking form
//!
//! A [`BookingDraft`] is owned by one session and mutated field by field as the
//! user types. Validation and the submission gate only ever read it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use validator::{Validate, ValidationError};

use core_kernel::DocumentId;
use domain_pricing::{rental_days, AddOnService, CarSummary, InsuranceTier, RentalQuoteRequest};

/// Minimum number of digits in a phone number
pub const MIN_PHONE_DIGITS: usize = 8;

/// Every field the booking form can report an error on, in form order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingField {
    /// The car being booked, chosen before the form is filled in
    Car,
    Name,
    Email,
    Phone,
    License,
    Street,
    City,
    Area,
    PostalCode,
    Country,
    PickupDate,
    ReturnDate,
    PickupLocation,
    ReturnLocation,
    Insurance,
    IdDocument,
    PassportDocument,
    AgeConfirmed,
}

impl BookingField {
    pub const ALL: [BookingField; 18] = [
        BookingField::Car,
        BookingField::Name,
        BookingField::Email,
        BookingField::Phone,
        BookingField::License,
        BookingField::Street,
        BookingField::City,
        BookingField::Area,
        BookingField::PostalCode,
        BookingField::Country,
        BookingField::PickupDate,
        BookingField::ReturnDate,
        BookingField::PickupLocation,
        BookingField::ReturnLocation,
        BookingField::Insurance,
        BookingField::IdDocument,
        BookingField::PassportDocument,
        BookingField::AgeConfirmed,
    ];

    /// Form field name
    pub fn name(&self) -> &'static str {
        match self {
            BookingField::Car => "car",
            BookingField::Name => "name",
            BookingField::Email => "email",
            BookingField::Phone => "phone",
            BookingField::License => "license",
            BookingField::Street => "street",
            BookingField::City => "city",
            BookingField::Area => "area",
            BookingField::PostalCode => "postal_code",
            BookingField::Country => "country",
            BookingField::PickupDate => "pickup_date",
            BookingField::ReturnDate => "return_date",
            BookingField::PickupLocation => "pickup_location",
            BookingField::ReturnLocation => "return_location",
            BookingField::Insurance => "insurance",
            BookingField::IdDocument => "id_document",
            BookingField::PassportDocument => "passport_document",
            BookingField::AgeConfirmed => "age_confirmed",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        BookingField::ALL.into_iter().find(|field| field.name() == name)
    }
}

impl fmt::Display for BookingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Driver and contact details
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CustomerDetails {
    #[validate(length(min = 2, max = 100))]
    pub name: String,
    #[validate(email, custom(function = "validate_email_domain"))]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    /// Driving license number
    #[validate(length(min = 5, max = 50))]
    pub license: String,
}

/// Customer's home address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AddressDetails {
    #[validate(length(min = 2, max = 200))]
    pub street: String,
    #[validate(length(min = 2, max = 100))]
    pub city: String,
    #[validate(length(max = 100))]
    pub area: Option<String>,
    #[validate(length(max = 20))]
    pub postal_code: Option<String>,
    #[validate(length(min = 2, max = 200))]
    pub country: String,
}

/// An uploaded identity document held by the external file store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub id: DocumentId,
    pub file_name: String,
    /// MIME type reported at upload, e.g. `image/png`
    pub content_type: String,
    pub size_bytes: u64,
}

/// Booking form state for one session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingDraft {
    pub customer: CustomerDetails,
    pub address: AddressDetails,
    pub pickup_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub pickup_location: String,
    pub return_location: String,
    pub insurance: Option<InsuranceTier>,
    pub add_on_services: BTreeSet<AddOnService>,
    pub id_document: Option<DocumentRef>,
    pub passport_document: Option<DocumentRef>,
    /// Driver confirmed they meet the minimum rental age
    pub age_confirmed: bool,
}

impl BookingDraft {
    /// Rental days implied by the selected dates; 0 until both are set and ordered
    pub fn rental_days(&self) -> u32 {
        match (self.pickup_date, self.return_date) {
            (Some(pickup), Some(return_date)) => rental_days(pickup, return_date),
            _ => 0,
        }
    }

    /// Current text of a free-text field
    pub fn text_value(&self, field: BookingField) -> Option<&str> {
        match field {
            BookingField::Name => Some(&self.customer.name),
            BookingField::Email => Some(&self.customer.email),
            BookingField::Phone => Some(&self.customer.phone),
            BookingField::License => Some(&self.customer.license),
            BookingField::Street => Some(&self.address.street),
            BookingField::City => Some(&self.address.city),
            BookingField::Area => self.address.area.as_deref(),
            BookingField::PostalCode => self.address.postal_code.as_deref(),
            BookingField::Country => Some(&self.address.country),
            BookingField::PickupLocation => Some(&self.pickup_location),
            BookingField::ReturnLocation => Some(&self.return_location),
            _ => None,
        }
    }

    /// Builds the pricing request for the selected car
    ///
    /// Returns `None` until a car and both dates are chosen. An unselected
    /// insurance tier prices as no insurance.
    pub fn quote_request(&self, car: Option<&CarSummary>) -> Option<RentalQuoteRequest> {
        let car = car?;
        let (pickup, return_date) = (self.pickup_date?, self.return_date?);
        let tier = self.insurance.unwrap_or(InsuranceTier::None);
        Some(
            RentalQuoteRequest::for_dates(car, pickup, return_date, tier)
                .with_services(self.add_on_services.iter().copied()),
        )
    }
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let trimmed = phone.trim();
    let body = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let allowed = body
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')'));
    let digits = body.chars().filter(|c| c.is_ascii_digit()).count();

    if allowed && digits >= MIN_PHONE_DIGITS {
        Ok(())
    } else {
        Err(ValidationError::new("phone"))
    }
}

// The email validator accepts single-label domains ("user@localhost").
fn validate_email_domain(email: &str) -> Result<(), ValidationError> {
    let has_suffix = email
        .rsplit_once('@')
        .and_then(|(_, domain)| domain.rsplit_once('.'))
        .is_some_and(|(host, tld)| !host.is_empty() && tld.len() >= 2);

    if has_suffix {
        Ok(())
    } else {
        Err(ValidationError::new("email"))
    }
}
