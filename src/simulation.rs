use std::cmp::Reverse;
use std::collections::HashMap;

use itertools::Itertools;
use log::info;
use priority_queue::PriorityQueue;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SM2Error};
use crate::mastery::MasteryLevel;
use crate::quality::Quality;
use crate::scheduler::{MemoryState, next_state};

const FIRST_QUALITIES: [Quality; 6] = [
    Quality::Blackout,
    Quality::Incorrect,
    Quality::Familiar,
    Quality::Difficult,
    Quality::Hesitant,
    Quality::Perfect,
];
const SUCCESS_QUALITIES: [Quality; 3] = [Quality::Difficult, Quality::Hesitant, Quality::Perfect];
const LAPSE_QUALITIES: [Quality; 3] = [Quality::Blackout, Quality::Incorrect, Quality::Familiar];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub deck_size: usize,
    /// Number of simulated days.
    pub learn_span: usize,
    /// New cards introduced per day.
    pub learn_limit: usize,
    pub review_limit: usize,
    /// Seconds of study after which no more cards are taken that day.
    pub max_cost_per_day: f32,
    /// Chance that a due card is recalled.
    pub recall_rate: f32,
    pub first_quality_prob: [f32; 6],
    /// Weights for qualities 3, 4 and 5 on a successful review.
    pub success_quality_prob: [f32; 3],
    /// Weights for qualities 0, 1 and 2 on a lapse.
    pub lapse_quality_prob: [f32; 3],
    pub learn_cost: f32,
    pub review_cost: f32,
    pub lapse_cost: f32,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            deck_size: 1000,
            learn_span: 365,
            learn_limit: 20,
            review_limit: usize::MAX,
            max_cost_per_day: 3600.0,
            recall_rate: 0.85,
            first_quality_prob: [0.05, 0.1, 0.15, 0.3, 0.3, 0.1],
            success_quality_prob: [0.25, 0.5, 0.25],
            lapse_quality_prob: [0.2, 0.4, 0.4],
            learn_cost: 20.0,
            review_cost: 8.0,
            lapse_cost: 15.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: i64,
    pub state: MemoryState,
    /// Day of the latest review, `None` until the card is introduced.
    pub last_day: Option<usize>,
    pub due: usize,
    pub lapses: u32,
}

impl Card {
    pub fn is_new(&self) -> bool {
        self.last_day.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub review_cnt_per_day: Vec<usize>,
    pub learn_cnt_per_day: Vec<usize>,
    pub lapse_cnt_per_day: Vec<usize>,
    pub cost_per_day: Vec<f32>,
    pub cards: Vec<Card>,
}

impl SimulationResult {
    /// How many cards sit at each mastery level at the end of the run.
    pub fn mastery_breakdown(&self) -> HashMap<MasteryLevel, usize> {
        self.cards.iter().map(|card| card.state.mastery()).counts()
    }

    pub fn total_cost(&self) -> f32 {
        self.cost_per_day.iter().sum()
    }
}

fn weighted(prob: &[f32]) -> Result<WeightedIndex<f32>> {
    WeightedIndex::new(prob).map_err(|_| SM2Error::InvalidProbabilities)
}

fn card_priority(card: &Card) -> Reverse<(usize, bool, i64)> {
    // earliest due first, reviews before new cards
    Reverse((card.due, card.is_new(), card.id))
}

pub fn simulate(config: &SimulatorConfig, seed: Option<u64>) -> Result<SimulationResult> {
    if config.deck_size == 0 {
        return Err(SM2Error::InvalidDeckSize);
    }
    if config.learn_span == 0 {
        return Err(SM2Error::InvalidLearnSpan);
    }
    if !(0.0..=1.0).contains(&config.recall_rate) {
        return Err(SM2Error::InvalidProbabilities);
    }
    let first_quality_dist = weighted(&config.first_quality_prob)?;
    let success_quality_dist = weighted(&config.success_quality_prob)?;
    let lapse_quality_dist = weighted(&config.lapse_quality_prob)?;

    let mut review_cnt_per_day = vec![0; config.learn_span];
    let mut learn_cnt_per_day = vec![0; config.learn_span];
    let mut lapse_cnt_per_day = vec![0; config.learn_span];
    let mut cost_per_day = vec![0.0; config.learn_span];

    let mut rng = StdRng::seed_from_u64(seed.unwrap_or(42));

    let mut cards = (0..config.deck_size)
        .map(|i| Card {
            id: i as i64,
            state: MemoryState::new_card(),
            last_day: None,
            due: i.checked_div(config.learn_limit).unwrap_or(config.learn_span),
            lapses: 0,
        })
        .collect_vec();

    let mut card_priorities = PriorityQueue::new();
    for (i, card) in cards.iter().enumerate() {
        card_priorities.push(i, card_priority(card));
    }

    while let Some((&card_index, _)) = card_priorities.peek() {
        let card = &mut cards[card_index];
        let day = card.due;
        let is_new = card.is_new();

        if day >= config.learn_span {
            card_priorities.pop();
            continue;
        }

        let over_limit = if is_new {
            learn_cnt_per_day[day] + 1 > config.learn_limit
        } else {
            review_cnt_per_day[day] + 1 > config.review_limit
        };
        if over_limit || cost_per_day[day] > config.max_cost_per_day {
            card.due = day + 1;
            card_priorities.change_priority(&card_index, card_priority(card));
            continue;
        }

        let quality = if is_new {
            learn_cnt_per_day[day] += 1;
            cost_per_day[day] += config.learn_cost;
            FIRST_QUALITIES[first_quality_dist.sample(&mut rng)]
        } else if rng.random_bool(config.recall_rate as f64) {
            review_cnt_per_day[day] += 1;
            cost_per_day[day] += config.review_cost;
            SUCCESS_QUALITIES[success_quality_dist.sample(&mut rng)]
        } else {
            review_cnt_per_day[day] += 1;
            lapse_cnt_per_day[day] += 1;
            cost_per_day[day] += config.lapse_cost;
            card.lapses += 1;
            LAPSE_QUALITIES[lapse_quality_dist.sample(&mut rng)]
        };

        card.state = next_state(&card.state, quality)?;
        card.last_day = Some(day);
        card.due = day.saturating_add(card.state.interval_days as usize);
        card_priorities.change_priority(&card_index, card_priority(card));
    }

    info!(
        "simulated {} cards over {} days: {} learned, {} reviews, {} lapses",
        config.deck_size,
        config.learn_span,
        learn_cnt_per_day.iter().sum::<usize>(),
        review_cnt_per_day.iter().sum::<usize>(),
        lapse_cnt_per_day.iter().sum::<usize>(),
    );

    Ok(SimulationResult {
        review_cnt_per_day,
        learn_cnt_per_day,
        lapse_cnt_per_day,
        cost_per_day,
        cards,
    })
}

/// Runs one simulation per seed in parallel. Results come back in seed order.
pub fn simulate_many(config: &SimulatorConfig, seeds: &[u64]) -> Result<Vec<SimulationResult>> {
    seeds
        .par_iter()
        .map(|&seed| simulate(config, Some(seed)))
        .collect()
}
