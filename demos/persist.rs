use chrono::{DateTime, TimeDelta, Utc};
use rusqlite::{Connection, params};
use sm2_review::{MemoryState, ReviewLogEntry, replay, review_card};

fn open() -> rusqlite::Result<Connection> {
    let db = Connection::open_in_memory()?;
    db.execute_batch(
        "CREATE TABLE cards (
             id INTEGER PRIMARY KEY,
             easiness_factor REAL NOT NULL DEFAULT 2.5,
             repetitions INTEGER NOT NULL DEFAULT 0,
             interval_days INTEGER NOT NULL DEFAULT 0,
             due TEXT NOT NULL
         );
         CREATE TABLE revlog (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             card_id INTEGER NOT NULL REFERENCES cards(id),
             entry TEXT NOT NULL
         );",
    )?;
    Ok(db)
}

fn load(db: &Connection, card_id: i64) -> Result<MemoryState, Box<dyn std::error::Error>> {
    let (ef, repetitions, interval): (f64, i64, i64) = db.query_row(
        "SELECT easiness_factor, repetitions, interval_days FROM cards WHERE id = ?1",
        [card_id],
        |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
    )?;
    Ok(MemoryState::from_raw(ef, repetitions, interval)?)
}

fn record(
    db: &mut Connection,
    card_id: i64,
    quality: u8,
    now: DateTime<Utc>,
) -> Result<ReviewLogEntry, Box<dyn std::error::Error>> {
    let state = load(db, card_id)?;
    let (scheduled, entry) = review_card(card_id, &state, quality, now)?;
    let tx = db.transaction()?;
    tx.execute(
        "UPDATE cards SET easiness_factor = ?1, repetitions = ?2, interval_days = ?3, due = ?4
         WHERE id = ?5",
        params![
            scheduled.state.easiness_factor,
            scheduled.state.repetition_count,
            scheduled.state.interval_days,
            scheduled.next_review_at.to_rfc3339(),
            card_id
        ],
    )?;
    tx.execute(
        "INSERT INTO revlog (card_id, entry) VALUES (?1, ?2)",
        params![card_id, serde_json::to_string(&entry)?],
    )?;
    tx.commit()?;
    Ok(entry)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = open()?;
    let mut now = Utc::now();
    db.execute(
        "INSERT INTO cards (id, due) VALUES (?1, ?2)",
        params![1, now.to_rfc3339()],
    )?;

    for quality in [5, 4, 4, 1, 3, 5] {
        let entry = record(&mut db, 1, quality, now)?;
        println!(
            "quality {} -> interval {} days, EF {}",
            quality, entry.after.interval_days, entry.after.easiness_factor
        );
        now = entry.next_review_at + TimeDelta::hours(2);
    }

    let mut stmt = db.prepare("SELECT entry FROM revlog WHERE card_id = ?1 ORDER BY id")?;
    let log = stmt
        .query_map([1], |row| row.get::<_, String>(0))?
        .map(|json| Ok(serde_json::from_str::<ReviewLogEntry>(&json?)?))
        .collect::<Result<Vec<_>, Box<dyn std::error::Error>>>()?;

    assert_eq!(replay(&log)?, load(&db, 1)?);
    println!("Stored state matches the replayed review log");
    Ok(())
}
