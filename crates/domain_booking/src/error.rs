//! Booking domain errors

use thiserror::Error;

use core_kernel::PortError;
use domain_pricing::PricingError;
use crate::gate::{GateEvent, GateState};

/// A gate transition that was refused; the gate is left untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("Invalid gate transition from {from} on {event}")]
    InvalidTransition { from: GateState, event: GateEvent },

    #[error("Challenge token expired")]
    TokenExpired,
}

/// Errors that can occur in the booking domain
#[derive(Debug, Error)]
pub enum BookingError {
    #[error(transparent)]
    Gate(#[from] GateError),

    #[error("Transport error: {0}")]
    Transport(#[from] PortError),

    #[error("Pricing error: {0}")]
    Pricing(#[from] PricingError),

    #[error("No car selected")]
    NoCarSelected,

    #[error("Draft is missing {0}")]
    IncompleteDraft(&'static str),
}

impl BookingError {
    /// True when the failure came from the transport and may succeed on retry
    pub fn is_transient(&self) -> bool {
        matches!(self, BookingError::Transport(e) if e.is_transient())
    }
}
