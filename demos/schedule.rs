use chrono::{DateTime, Utc};
use sm2_review::{
    MemoryState, Quality, classify_mastery, describe_quality, next_states, schedule_next_review,
};

struct Card {
    due: DateTime<Utc>,
    memory_state: MemoryState,
}

impl Card {
    pub fn new() -> Self {
        Self {
            due: Utc::now(),
            memory_state: MemoryState::new_card(),
        }
    }
}

fn print_previews(card: &Card, now: DateTime<Utc>) -> Result<(), Box<dyn std::error::Error>> {
    for (quality, outcome) in next_states(&card.memory_state, now)?.iter() {
        println!(
            "{} ({}): {} days",
            quality.value(),
            describe_quality(quality),
            outcome.state.interval_days
        );
    }
    Ok(())
}

fn schedule_new_card() -> Result<(), Box<dyn std::error::Error>> {
    let mut card = Card::new();
    let now = Utc::now();

    print_previews(&card, now)?;

    // Assume the card was recalled after a short hesitation
    let review = schedule_next_review(Quality::Hesitant, &card.memory_state, now)?;
    card.memory_state = review.state;
    card.due = review.next_review_at;

    println!("Next review due: {}", card.due);
    println!("Memory state: {:?}", card.memory_state);
    Ok(())
}

fn schedule_existing_card() -> Result<(), Box<dyn std::error::Error>> {
    let mut card = Card {
        due: Utc::now(),
        memory_state: MemoryState {
            easiness_factor: 2.5,
            repetition_count: 3,
            interval_days: 15,
        },
    };
    let now = Utc::now();

    print_previews(&card, now)?;

    // A rating coming straight from a form field is validated first
    let raw_rating: i64 = 1;
    let review = schedule_next_review(raw_rating, &card.memory_state, now)?;
    card.memory_state = review.state;
    card.due = review.next_review_at;

    println!("Next review due: {}", card.due);
    println!(
        "Memory state: {:?} ({})",
        card.memory_state,
        classify_mastery(
            card.memory_state.easiness_factor,
            card.memory_state.repetition_count
        )
    );

    if let Err(err) = schedule_next_review(7i64, &card.memory_state, now) {
        println!("Rejected rating: {err}");
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Scheduling a new card:");
    schedule_new_card()?;

    println!("\nScheduling an existing card:");
    schedule_existing_card()?;

    Ok(())
}
