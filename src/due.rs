use std::cmp::Reverse;

use chrono::{DateTime, Utc};
use itertools::Itertools;
use priority_queue::PriorityQueue;

/// In-memory index of when each card is next due. Earliest due comes out
/// first; ties go to the lower card id.
#[derive(Debug, Clone, Default)]
pub struct DueQueue {
    queue: PriorityQueue<i64, Reverse<(DateTime<Utc>, i64)>>,
}

impl DueQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a card, or moves it if it is already queued. Returns the previous
    /// due date.
    pub fn insert(&mut self, card_id: i64, due: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.queue
            .push(card_id, Reverse((due, card_id)))
            .map(|Reverse((due, _))| due)
    }

    pub fn remove(&mut self, card_id: i64) -> Option<DateTime<Utc>> {
        self.queue
            .remove(&card_id)
            .map(|(_, Reverse((due, _)))| due)
    }

    pub fn due_at(&self, card_id: i64) -> Option<DateTime<Utc>> {
        self.queue
            .get_priority(&card_id)
            .map(|Reverse((due, _))| *due)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// The card that comes due first, whether or not it is due yet.
    pub fn next_due(&self) -> Option<(i64, DateTime<Utc>)> {
        self.queue
            .peek()
            .map(|(&card_id, Reverse((due, _)))| (card_id, *due))
    }

    /// Takes the earliest card off the queue if it is due at `now`.
    pub fn pop_due(&mut self, now: DateTime<Utc>) -> Option<i64> {
        match self.next_due() {
            Some((_, due)) if due <= now => self.queue.pop().map(|(card_id, _)| card_id),
            _ => None,
        }
    }

    /// Every card due at `now`, earliest first, without removing them.
    pub fn due_cards(&self, now: DateTime<Utc>) -> Vec<i64> {
        self.queue
            .iter()
            .filter(|(_, Reverse((due, _)))| *due <= now)
            .sorted_by_key(|(_, priority)| priority.0)
            .map(|(&card_id, _)| card_id)
            .collect()
    }
}
