use log::LevelFilter;
use sm2_review::{MasteryLevel, SimulatorConfig, simulate_many};
use strum::IntoEnumIterator;

fn setup_logger() -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(LevelFilter::Info)
        .chain(std::io::stdout())
        .apply()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logger()?;

    let config = SimulatorConfig {
        deck_size: 2000,
        learn_span: 120,
        learn_limit: 25,
        ..Default::default()
    };
    let seeds = (0..8).collect::<Vec<u64>>();
    let results = simulate_many(&config, &seeds)?;

    let runs = results.len() as f32;
    let avg_minutes = results.iter().map(|r| r.total_cost()).sum::<f32>()
        / runs
        / config.learn_span as f32
        / 60.0;
    println!("Average study time: {avg_minutes:.1} minutes per day");

    for level in MasteryLevel::iter() {
        let cards = results
            .iter()
            .map(|r| r.mastery_breakdown().get(&level).copied().unwrap_or(0))
            .sum::<usize>() as f32
            / runs;
        println!("{level}: {cards:.0} cards");
    }
    Ok(())
}
