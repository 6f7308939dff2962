//! Booking submission port
//!
//! The assembled booking leaves the core through a single async call to the
//! booking intake collaborator. Retry and backoff belong to the adapter.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use core_kernel::{BookingId, CarId, DomainPort, PortError, SessionId};
use domain_pricing::{AddOnService, CarSummary, InsuranceTier, PriceBreakdown};
use crate::challenge::ChallengeToken;
use crate::draft::{AddressDetails, BookingDraft, CustomerDetails, DocumentRef};
use crate::error::BookingError;

/// Identity documents attached to a booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDocuments {
    pub id_document: DocumentRef,
    pub passport_document: DocumentRef,
}

/// Everything the intake collaborator needs to register a booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSubmission {
    pub session_id: SessionId,
    pub car_id: CarId,
    pub customer: CustomerDetails,
    pub address: AddressDetails,
    pub documents: BookingDocuments,
    pub pickup_date: NaiveDate,
    pub return_date: NaiveDate,
    pub pickup_location: String,
    pub return_location: String,
    pub insurance_tier: InsuranceTier,
    pub add_on_services: BTreeSet<AddOnService>,
    pub price: PriceBreakdown,
    pub challenge_token: ChallengeToken,
}

impl BookingSubmission {
    /// Assembles the payload from a validated draft
    pub fn assemble(
        session_id: SessionId,
        car: &CarSummary,
        draft: &BookingDraft,
        price: PriceBreakdown,
        challenge_token: ChallengeToken,
    ) -> Result<Self, BookingError> {
        let pickup_date = draft.pickup_date.ok_or(BookingError::IncompleteDraft("pickup_date"))?;
        let return_date = draft.return_date.ok_or(BookingError::IncompleteDraft("return_date"))?;
        let insurance_tier = draft.insurance.ok_or(BookingError::IncompleteDraft("insurance"))?;
        let id_document = draft
            .id_document
            .clone()
            .ok_or(BookingError::IncompleteDraft("id_document"))?;
        let passport_document = draft
            .passport_document
            .clone()
            .ok_or(BookingError::IncompleteDraft("passport_document"))?;

        Ok(Self {
            session_id,
            car_id: car.id,
            customer: draft.customer.clone(),
            address: draft.address.clone(),
            documents: BookingDocuments {
                id_document,
                passport_document,
            },
            pickup_date,
            return_date,
            pickup_location: draft.pickup_location.trim().to_string(),
            return_location: draft.return_location.trim().to_string(),
            insurance_tier,
            add_on_services: draft.add_on_services.clone(),
            price,
            challenge_token,
        })
    }
}

/// Acknowledgement from the intake collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingReceipt {
    pub booking_id: BookingId,
    /// Human-readable reference shown to the customer
    pub reference: String,
}

/// Outbound port to the booking intake collaborator
#[async_trait]
pub trait BookingTransport: DomainPort {
    async fn submit(&self, submission: &BookingSubmission) -> Result<BookingReceipt, PortError>;
}
