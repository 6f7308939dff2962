//! Test Doubles
//!
//! In-memory stand-ins for the collaborators the booking core talks to: the
//! booking intake transport and the host-rendered challenge widget.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use core_kernel::{BookingId, DomainPort, PortError};
use domain_booking::{BookingReceipt, BookingSubmission, BookingTransport, ChallengeWidget, WidgetInstance};

/// Transport that records submissions and can be told to fail
#[derive(Debug, Default)]
pub struct InMemoryTransport {
    submissions: Mutex<Vec<BookingSubmission>>,
    failures: Mutex<VecDeque<PortError>>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an error for the next submit call
    pub fn fail_next(&self, error: PortError) {
        self.failures.lock().unwrap().push_back(error);
    }

    /// Every accepted submission, oldest first
    pub fn submissions(&self) -> Vec<BookingSubmission> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.lock().unwrap().len()
    }
}

impl DomainPort for InMemoryTransport {}

#[async_trait]
impl BookingTransport for InMemoryTransport {
    async fn submit(&self, submission: &BookingSubmission) -> Result<BookingReceipt, PortError> {
        if let Some(error) = self.failures.lock().unwrap().pop_front() {
            return Err(error);
        }

        let mut submissions = self.submissions.lock().unwrap();
        submissions.push(submission.clone());
        Ok(BookingReceipt {
            booking_id: BookingId::new(),
            reference: format!("RB-{:06}", submissions.len()),
        })
    }
}

/// What the session asked the widget to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetEvent {
    Shown(WidgetInstance),
    Hidden,
}

/// Widget that records show/hide requests; clones share one log
#[derive(Debug, Clone, Default)]
pub struct RecordingWidget {
    events: Arc<Mutex<Vec<WidgetEvent>>>,
}

impl RecordingWidget {
    pub fn events(&self) -> Vec<WidgetEvent> {
        self.events.lock().unwrap().clone()
    }

    /// The most recently shown instance
    pub fn last_shown(&self) -> Option<WidgetInstance> {
        self.events().into_iter().rev().find_map(|event| match event {
            WidgetEvent::Shown(instance) => Some(instance),
            WidgetEvent::Hidden => None,
        })
    }

    pub fn shown_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, WidgetEvent::Shown(_)))
            .count()
    }
}

impl ChallengeWidget for RecordingWidget {
    fn show(&mut self, instance: WidgetInstance) {
        self.events.lock().unwrap().push(WidgetEvent::Shown(instance));
    }

    fn hide(&mut self) {
        self.events.lock().unwrap().push(WidgetEvent::Hidden);
    }
}
