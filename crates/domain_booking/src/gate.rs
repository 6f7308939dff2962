//! Submission gate
//!
//! The gate decides when a draft may be handed to the booking transport. A
//! submission needs both a successful validation and a verified challenge,
//! and no transition skips a state:
//!
//! ```text
//! Editing ──valid──▶ Validated ──▶ ChallengePending ──verify──▶ ChallengeVerified
//!    ▲                                 ▲      │ error/expire (stays)      │
//!    │                                 └──────┴──────────error/expire─────┤
//!    └───────────────────────────edit─────────────────────────────────────┤
//!                                                                       submit
//!                                                                         ▼
//!   Editing ◀──success── Submitting ──failure──▶ Failed ──retry──▶ ChallengeVerified | Editing
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::challenge::{ChallengeCallbacks, ChallengeToken, WidgetInstance};
use crate::error::GateError;
use crate::validation::ValidationResult;

/// Gate state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    Editing,
    Validated,
    ChallengePending,
    ChallengeVerified,
    Submitting,
    Failed,
}

impl GateState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateState::Editing => "editing",
            GateState::Validated => "validated",
            GateState::ChallengePending => "challenge_pending",
            GateState::ChallengeVerified => "challenge_verified",
            GateState::Submitting => "submitting",
            GateState::Failed => "failed",
        }
    }
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input that drives a gate transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateEvent {
    Validate,
    ShowChallenge,
    ChallengeVerified,
    ChallengeError,
    ChallengeExpired,
    RetryChallenge,
    Edit,
    Submit,
    SubmissionSucceeded,
    SubmissionFailed,
    Retry,
}

impl GateEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateEvent::Validate => "validate",
            GateEvent::ShowChallenge => "show_challenge",
            GateEvent::ChallengeVerified => "challenge_verified",
            GateEvent::ChallengeError => "challenge_error",
            GateEvent::ChallengeExpired => "challenge_expired",
            GateEvent::RetryChallenge => "retry_challenge",
            GateEvent::Edit => "edit",
            GateEvent::Submit => "submit",
            GateEvent::SubmissionSucceeded => "submission_succeeded",
            GateEvent::SubmissionFailed => "submission_failed",
            GateEvent::Retry => "retry",
        }
    }
}

impl fmt::Display for GateEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-session submission gate
#[derive(Debug, Clone)]
pub struct SubmissionGate {
    state: GateState,
    token: Option<ChallengeToken>,
    widget_instance: WidgetInstance,
    token_ttl: Duration,
    last_failure: Option<String>,
}

impl SubmissionGate {
    pub fn new(token_ttl: Duration) -> Self {
        Self {
            state: GateState::Editing,
            token: None,
            widget_instance: WidgetInstance::default(),
            token_ttl,
            last_failure: None,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn token(&self) -> Option<&ChallengeToken> {
        self.token.as_ref()
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// The widget instance currently shown (or last shown)
    pub fn widget_instance(&self) -> WidgetInstance {
        self.widget_instance
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Reason the last submission attempt failed, while in `Failed`
    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    /// True only in `ChallengeVerified` with a live token
    pub fn can_submit(&self, now: DateTime<Utc>) -> bool {
        self.state == GateState::ChallengeVerified
            && self
                .token
                .as_ref()
                .is_some_and(|token| !token.is_expired(now, self.token_ttl))
    }

    /// Applies the outcome of validating the current draft
    ///
    /// A valid draft moves through `Validated` straight to `ChallengePending`
    /// and issues a new widget instance; an invalid one leaves the gate in
    /// `Editing`. Only allowed from `Editing`.
    pub fn record_validation(&mut self, result: &ValidationResult) -> Result<GateState, GateError> {
        self.ensure(GateState::Editing, GateEvent::Validate)?;

        if result.is_valid() {
            self.transition(GateState::Validated, GateEvent::Validate);
            self.issue_widget();
            self.transition(GateState::ChallengePending, GateEvent::ShowChallenge);
        } else {
            tracing::debug!(state = %self.state, "validation failed, gate stays in editing");
        }
        Ok(self.state)
    }

    /// Issues a fresh widget after a challenge error or expiry
    pub fn retry_challenge(&mut self) -> Result<WidgetInstance, GateError> {
        self.ensure(GateState::ChallengePending, GateEvent::RetryChallenge)?;
        self.token = None;
        Ok(self.issue_widget())
    }

    /// Returns to `Editing` because the draft is about to change
    ///
    /// Any held token is discarded. Refused while a submission is in flight.
    pub fn edit(&mut self) -> Result<(), GateError> {
        match self.state {
            GateState::Editing => Ok(()),
            GateState::Submitting => Err(self.refuse(GateEvent::Edit)),
            _ => {
                self.token = None;
                self.last_failure = None;
                self.transition(GateState::Editing, GateEvent::Edit);
                Ok(())
            }
        }
    }

    /// Starts a submission and hands out the token to send with it
    ///
    /// An expired token sends the gate back to `ChallengePending` with a new
    /// widget instance and fails with [`GateError::TokenExpired`].
    pub fn begin_submission(&mut self, now: DateTime<Utc>) -> Result<ChallengeToken, GateError> {
        self.ensure(GateState::ChallengeVerified, GateEvent::Submit)?;

        let token = match self.token.as_ref() {
            Some(token) if !token.is_expired(now, self.token_ttl) => token.clone(),
            _ => {
                tracing::warn!(state = %self.state, "challenge token expired before submission");
                self.token = None;
                self.issue_widget();
                self.transition(GateState::ChallengePending, GateEvent::ChallengeExpired);
                return Err(GateError::TokenExpired);
            }
        };

        self.transition(GateState::Submitting, GateEvent::Submit);
        Ok(token)
    }

    /// The transport accepted the booking; the gate starts over
    pub fn submission_succeeded(&mut self) -> Result<(), GateError> {
        self.ensure(GateState::Submitting, GateEvent::SubmissionSucceeded)?;
        self.token = None;
        self.last_failure = None;
        self.transition(GateState::Editing, GateEvent::SubmissionSucceeded);
        Ok(())
    }

    /// The transport failed; the token is kept for a retry
    pub fn submission_failed(&mut self, reason: impl Into<String>) -> Result<(), GateError> {
        self.ensure(GateState::Submitting, GateEvent::SubmissionFailed)?;
        self.last_failure = Some(reason.into());
        self.transition(GateState::Failed, GateEvent::SubmissionFailed);
        Ok(())
    }

    /// Leaves `Failed`: back to `ChallengeVerified` while the token is still
    /// live, otherwise to `Editing` for a fresh validation and challenge
    pub fn retry(&mut self, now: DateTime<Utc>) -> Result<GateState, GateError> {
        self.ensure(GateState::Failed, GateEvent::Retry)?;
        self.last_failure = None;

        let live = self
            .token
            .as_ref()
            .is_some_and(|token| !token.is_expired(now, self.token_ttl));
        if live {
            self.transition(GateState::ChallengeVerified, GateEvent::Retry);
        } else {
            self.token = None;
            self.transition(GateState::Editing, GateEvent::Retry);
        }
        Ok(self.state)
    }

    fn challenge_lost(&mut self, event: GateEvent) -> Result<GateState, GateError> {
        match self.state {
            GateState::ChallengePending => {
                self.token = None;
                tracing::info!(state = %self.state, event = %event, "challenge must be retried");
            }
            GateState::ChallengeVerified => {
                self.token = None;
                self.transition(GateState::ChallengePending, event);
            }
            GateState::Failed => {
                // retry will fall back to Editing
                self.token = None;
                tracing::info!(state = %self.state, event = %event, "challenge token dropped");
            }
            _ => return Err(self.refuse(event)),
        }
        Ok(self.state)
    }

    fn issue_widget(&mut self) -> WidgetInstance {
        self.widget_instance = self.widget_instance.next();
        self.widget_instance
    }

    fn ensure(&self, expected: GateState, event: GateEvent) -> Result<(), GateError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(self.refuse(event))
        }
    }

    fn refuse(&self, event: GateEvent) -> GateError {
        tracing::debug!(state = %self.state, event = %event, "gate transition refused");
        GateError::InvalidTransition {
            from: self.state,
            event,
        }
    }

    fn transition(&mut self, to: GateState, event: GateEvent) {
        tracing::info!(from = %self.state, to = %to, event = %event, "gate transition");
        self.state = to;
    }
}

impl ChallengeCallbacks for SubmissionGate {
    fn on_verify(&mut self, token: ChallengeToken) -> Result<GateState, GateError> {
        self.ensure(GateState::ChallengePending, GateEvent::ChallengeVerified)?;
        self.token = Some(token);
        self.transition(GateState::ChallengeVerified, GateEvent::ChallengeVerified);
        Ok(self.state)
    }

    fn on_error(&mut self) -> Result<GateState, GateError> {
        self.challenge_lost(GateEvent::ChallengeError)
    }

    fn on_expire(&mut self) -> Result<GateState, GateError> {
        self.challenge_lost(GateEvent::ChallengeExpired)
    }
}
