use chrono::Duration;
use clap::Parser;
use log::{error, info};
use std::error::Error;
use std::process;

use bus_board::cli::SourceArgs;
use bus_board::reminder::{LogSink, ReminderScheduler};
use timetable_search::Candidate;

/// Wait for a bus and log a reminder shortly before it leaves
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    /// Departure time exactly as written in the timetable, e.g. 07:15. The next bus if left out.
    #[arg(long, value_name = "HH:MM")]
    depart: Option<String>,

    /// Minutes before departure to be reminded
    #[arg(long, value_name = "MINUTES", default_value_t = 5)]
    lead: u32,
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let now = cli.source.now();
    let timetable = cli.source.source().load()?;
    let candidate: Candidate = match &cli.depart {
        Some(depart) => timetable
            .find_by_departure_time(depart, &now)
            .ok_or_else(|| format!("No {} bus today", depart))?,
        None => timetable
            .next_departures(&now, 1)
            .into_iter()
            .next()
            .ok_or("No more buses today")?,
    };

    let mut scheduler = ReminderScheduler::new(Duration::minutes(i64::from(cli.lead)));
    let reminder = scheduler.schedule(&candidate, &now)?;
    info!(
        "Waiting until {}, {} minutes before the {} bus",
        reminder.trigger,
        scheduler.lead_time().num_minutes(),
        candidate.trip
    );

    // with --at the clock is simulated, so the wait is measured from that instant
    let wait = (reminder.trigger - now).to_std().unwrap_or_default();
    tokio::time::sleep(wait).await;
    scheduler.deliver_due(&reminder.trigger, &mut LogSink);
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        error!("{}", err);
        process::exit(1);
    }
}
