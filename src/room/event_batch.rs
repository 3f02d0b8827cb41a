//! Timeline events and the collapsed batches they are grouped into.
//!
//! The room timeline shows consecutive small state events (such as the events
//! that set up a new room) as one collapsed group. Each group is an [`EventBatch`],
//! and a collapsed group links to the batch that follows it. Flattening that chain
//! yields every event of the group in timeline order.

use matrix_sdk::ruma::{
    events::TimelineEventType,
    MilliSecondsSinceUnixEpoch, OwnedEventId, OwnedUserId,
};

use crate::errors::ConfigurationError;

/// The maximum number of batches that will be followed when flattening a chain.
pub const MAX_COLLAPSED_BATCHES: usize = 10_000;

/// One event from a room timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct TimelineEvent {
    pub event_id: Option<OwnedEventId>,
    pub sender: OwnedUserId,
    pub event_type: TimelineEventType,
    pub origin_server_ts: MilliSecondsSinceUnixEpoch,
    /// The state key, present only for state events.
    pub state_key: Option<String>,
    /// The raw event content, interpreted by an [`EventFormatter`](crate::event_preview::EventFormatter).
    pub content: serde_json::Value,
}

impl TimelineEvent {
    pub fn is_room_create(&self) -> bool {
        self.event_type == TimelineEventType::RoomCreate
    }
}

/// A group of consecutive timeline events that are displayed together,
/// optionally followed by the next batch of the same collapsed group.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventBatch {
    pub events: Vec<TimelineEvent>,
    pub next: Option<Box<EventBatch>>,
}

impl EventBatch {
    pub fn new(events: Vec<TimelineEvent>) -> Self {
        Self { events, next: None }
    }

    /// Builds a chain from the given batches, in order.
    ///
    /// Returns `None` if `batches` is empty.
    pub fn chain(batches: impl IntoIterator<Item = Vec<TimelineEvent>>) -> Option<Self> {
        let batches: Vec<_> = batches.into_iter().collect();
        batches.into_iter().rev().fold(None, |next, events| {
            Some(Self { events, next: next.map(Box::new) })
        })
    }

    /// Iterates over this batch and every batch linked after it.
    pub fn iter(&self) -> impl Iterator<Item = &EventBatch> {
        std::iter::successors(Some(self), |batch| batch.next.as_deref())
    }

    /// Flattens this batch and all batches after it into one ordered list of events.
    ///
    /// Fails if the chain is longer than [`MAX_COLLAPSED_BATCHES`].
    pub fn flatten(&self) -> Result<Vec<TimelineEvent>, ConfigurationError> {
        let mut events = Vec::new();
        for (visited, batch) in self.iter().enumerate() {
            if visited >= MAX_COLLAPSED_BATCHES {
                return Err(ConfigurationError::BatchChainTooLong { limit: MAX_COLLAPSED_BATCHES });
            }
            events.extend(batch.events.iter().cloned());
        }
        Ok(events)
    }
}

// Dropping a long chain recursively could overflow the stack.
impl Drop for EventBatch {
    fn drop(&mut self) {
        let mut next = self.next.take();
        while let Some(mut batch) = next {
            next = batch.next.take();
        }
    }
}
