//! Business rules the validator and gate are parameterized by

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Largest accepted identity document, 5 MiB
pub const MAX_DOCUMENT_BYTES: u64 = 5 * 1024 * 1024;

const MAX_TOKEN_TTL_SECS: u64 = 86_400;

/// Booking rules supplied by configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingRules {
    /// Location codes offered for pick-up and return
    pub allowed_locations: BTreeSet<String>,
    /// Age the driver confirms they have reached
    pub minimum_driver_age: u32,
    pub max_document_bytes: u64,
    /// Accepted document MIME types
    pub allowed_document_types: BTreeSet<String>,
    /// Lifetime of a human-verification token
    pub challenge_token_ttl_secs: u64,
}

impl Default for BookingRules {
    fn default() -> Self {
        Self {
            allowed_locations: ["airport", "port", "city-office", "hotel-delivery"]
                .into_iter()
                .map(String::from)
                .collect(),
            minimum_driver_age: 21,
            max_document_bytes: MAX_DOCUMENT_BYTES,
            allowed_document_types: ["image/jpeg", "image/png", "application/pdf"]
                .into_iter()
                .map(String::from)
                .collect(),
            challenge_token_ttl_secs: 300,
        }
    }
}

impl BookingRules {
    pub fn is_allowed_location(&self, location: &str) -> bool {
        self.allowed_locations.contains(location.trim())
    }

    /// Compares the MIME essence only, so `image/PNG; name=x` matches `image/png`
    pub fn is_allowed_document_type(&self, content_type: &str) -> bool {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        self.allowed_document_types.contains(&essence)
    }

    /// Token lifetime, capped at one day
    pub fn challenge_token_ttl(&self) -> chrono::Duration {
        let secs = self.challenge_token_ttl_secs.min(MAX_TOKEN_TTL_SECS);
        chrono::Duration::seconds(secs as i64)
    }
}
