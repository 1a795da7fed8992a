//! Test doubles for the outcome source.

use crate::source::OutcomeSource;
use ringshot_types::Difficulty;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Error returned when a [`Fixed`] source has no queued response left.
#[derive(Debug, Clone, Error)]
#[error("no queued outcome response")]
pub struct Exhausted;

/// Outcome source that returns pre-queued responses in order, immediately.
///
/// The queued response length is authoritative; the requested dart count is
/// ignored so tests can exercise mismatched response lengths.
#[derive(Clone, Default)]
pub struct Fixed {
    responses: Arc<Mutex<VecDeque<Vec<u8>>>>,
}

impl Fixed {
    pub fn new(responses: Vec<Vec<u8>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses.into())),
        }
    }

    /// Queue another response.
    pub fn push(&self, codes: Vec<u8>) {
        self.responses.lock().unwrap().push_back(codes);
    }
}

impl OutcomeSource for Fixed {
    type Error = Exhausted;

    async fn request(&self, _difficulty: Difficulty, _darts: u32) -> Result<Vec<u8>, Exhausted> {
        self.responses.lock().unwrap().pop_front().ok_or(Exhausted)
    }
}
