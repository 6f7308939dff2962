//! Rental Booking Domain
//!
//! This crate implements the booking side of a rental:
//! - The booking draft and its field validation
//! - Business rules supplied by configuration
//! - The submission gate that requires validation and a verified human
//!   challenge before anything is sent
//! - The outbound booking transport port
//! - The per-session context tying draft, quote and gate together

pub mod draft;
pub mod rules;
pub mod validation;
pub mod challenge;
pub mod gate;
pub mod submission;
pub mod session;
pub mod error;

pub use draft::{AddressDetails, BookingDraft, BookingField, CustomerDetails, DocumentRef, MIN_PHONE_DIGITS};
pub use rules::{BookingRules, MAX_DOCUMENT_BYTES};
pub use validation::{BookingValidator, FieldError, FieldErrors, ValidationResult};
pub use challenge::{ChallengeCallbacks, ChallengeToken, ChallengeWidget, HeadlessWidget, WidgetInstance};
pub use gate::{GateEvent, GateState, SubmissionGate};
pub use submission::{BookingDocuments, BookingReceipt, BookingSubmission, BookingTransport};
pub use session::{BookingSession, Clock, FixedClock, SessionContext, SystemClock};
pub use error::{BookingError, GateError};
