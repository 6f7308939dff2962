//! Human-verification challenge capability
//!
//! The challenge widget is rendered by the host. The booking core only sees
//! the three callbacks it fires and asks it to show a fresh instance when the
//! user retries.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::GateError;
use crate::gate::GateState;

/// Single-use proof-of-humanity credential issued by the widget
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeToken {
    value: String,
    issued_at: DateTime<Utc>,
}

impl ChallengeToken {
    pub fn new(value: impl Into<String>, issued_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            issued_at,
        }
    }

    pub fn issued_now(value: impl Into<String>) -> Self {
        Self::new(value, Utc::now())
    }

    /// The opaque token, for the submission payload only
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    /// A token is expired once `ttl` has fully elapsed since issue
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.issued_at >= ttl
    }
}

impl fmt::Debug for ChallengeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChallengeToken")
            .field("value", &"<redacted>")
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

/// Sequence number of a rendered widget; a retry always gets a new one
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct WidgetInstance(u64);

impl WidgetInstance {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for WidgetInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Events the challenge widget reports back
///
/// Expiry is handled exactly like an error.
pub trait ChallengeCallbacks {
    fn on_verify(&mut self, token: ChallengeToken) -> Result<GateState, GateError>;

    fn on_error(&mut self) -> Result<GateState, GateError>;

    fn on_expire(&mut self) -> Result<GateState, GateError>;
}

/// Host-side widget rendering
pub trait ChallengeWidget {
    /// Renders a fresh widget, replacing any previous instance
    fn show(&mut self, instance: WidgetInstance);

    fn hide(&mut self);
}

/// Widget for hosts that render nothing, such as batch tools
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessWidget;

impl ChallengeWidget for HeadlessWidget {
    fn show(&mut self, _instance: WidgetInstance) {}

    fn hide(&mut self) {}
}
