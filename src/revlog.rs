use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SM2Error};
use crate::quality::Quality;
use crate::scheduler::{MemoryState, ScheduledReview, next_state, schedule};

/// One recorded review of a card. Entries are never modified once written;
/// the card's current state is whatever the latest entry's `after` says.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewLogEntry {
    pub card_id: i64,
    pub quality: Quality,
    pub before: MemoryState,
    pub after: MemoryState,
    pub reviewed_at: DateTime<Utc>,
    pub next_review_at: DateTime<Utc>,
}

impl ReviewLogEntry {
    pub fn new(
        card_id: i64,
        quality: Quality,
        before: MemoryState,
        scheduled: &ScheduledReview,
        reviewed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            card_id,
            quality,
            before,
            after: scheduled.state,
            reviewed_at,
            next_review_at: scheduled.next_review_at,
        }
    }

    /// Whole days the card was scheduled out for by this review.
    pub fn scheduled_days(&self) -> u32 {
        self.after.interval_days
    }
}

/// Schedules a review and produces the matching log entry in one step.
pub fn review_card<Q>(
    card_id: i64,
    state: &MemoryState,
    quality: Q,
    now: DateTime<Utc>,
) -> Result<(ScheduledReview, ReviewLogEntry)>
where
    Q: TryInto<Quality>,
    SM2Error: From<Q::Error>,
{
    let quality = quality.try_into()?;
    let scheduled = schedule(quality, state, now)?;
    let entry = ReviewLogEntry::new(card_id, quality, *state, &scheduled, now);
    Ok((scheduled, entry))
}

/// Rebuilds a card's state by replaying its review log over a new card.
/// Entries may arrive in any order; they are applied by `reviewed_at`. All
/// entries must belong to the same card.
pub fn replay<'a>(entries: impl IntoIterator<Item = &'a ReviewLogEntry>) -> Result<MemoryState> {
    let entries = entries
        .into_iter()
        .sorted_by_key(|entry| entry.reviewed_at)
        .collect_vec();
    if !entries.iter().map(|entry| entry.card_id).all_equal() {
        return Err(SM2Error::InvalidState {
            reason: "review log mixes entries from different cards",
        });
    }
    entries
        .into_iter()
        .try_fold(MemoryState::new_card(), |state, entry| {
            next_state(&state, entry.quality)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 9, 4, 18, 0, 0).unwrap()
    }

    fn study(card_id: i64, qualities: &[u8]) -> Vec<ReviewLogEntry> {
        let mut state = MemoryState::new_card();
        let mut now = start();
        let mut log = Vec::new();
        for &q in qualities {
            let (scheduled, entry) = review_card(card_id, &state, q, now).unwrap();
            state = scheduled.state;
            now = scheduled.next_review_at;
            log.push(entry);
        }
        log
    }

    #[test]
    fn entry_links_before_and_after() {
        let log = study(7, &[5, 4, 5]);
        assert_eq!(log.len(), 3);
        for (prev, next) in log.iter().tuple_windows() {
            assert_eq!(prev.after, next.before);
            assert_eq!(prev.next_review_at, next.reviewed_at);
        }
        let days = log.iter().map(ReviewLogEntry::scheduled_days).collect_vec();
        assert_eq!(days, [1, 6, 16]);
        assert!(log.iter().all(|entry| entry.card_id == 7));
    }

    #[test]
    fn first_entry_starts_from_new_card() {
        let log = study(1, &[3]);
        assert_eq!(log[0].before, MemoryState::new_card());
        assert_eq!(log[0].reviewed_at, start());
        assert_eq!(log[0].next_review_at, start() + TimeDelta::days(1));
    }

    #[test]
    fn replay_matches_live_state() {
        let log = study(3, &[5, 5, 2, 4, 4, 5]);
        let live = log.last().unwrap().after;
        assert_eq!(replay(&log).unwrap(), live);

        let shuffled = log.iter().rev().cloned().collect_vec();
        assert_eq!(replay(&shuffled).unwrap(), live);
    }

    #[test]
    fn replay_of_nothing_is_a_new_card() {
        assert_eq!(replay(&[]).unwrap(), MemoryState::new_card());
    }

    #[test]
    fn replay_rejects_mixed_cards() {
        let mut log = study(3, &[5, 4]);
        log.extend(study(4, &[3]));
        assert_eq!(
            replay(&log),
            Err(SM2Error::InvalidState {
                reason: "review log mixes entries from different cards",
            })
        );
    }

    #[test]
    fn typed_quality_is_accepted() {
        let (scheduled, entry) =
            review_card(5, &MemoryState::new_card(), Quality::Perfect, start()).unwrap();
        assert_eq!(entry.quality, Quality::Perfect);
        assert_eq!(entry.after, scheduled.state);
        assert_eq!(scheduled.state.interval_days, 1);
        assert_eq!(
            (scheduled, entry),
            review_card(5, &MemoryState::new_card(), 5u8, start()).unwrap()
        );
    }

    #[test]
    fn invalid_quality_produces_no_entry() {
        assert!(review_card(1, &MemoryState::new_card(), 9u8, start()).is_err());
    }

    #[test]
    fn serializes_for_storage() {
        let entry = study(11, &[4]).remove(0);
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"quality\":4"));
        assert_eq!(
            serde_json::from_str::<ReviewLogEntry>(&json).unwrap(),
            entry
        );
    }
}
