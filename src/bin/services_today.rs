use clap::Parser;
use log::error;
use std::error::Error;
use std::process;

use bus_board::cli::SourceArgs;
use timetable_search::resolver::{resolve_day_detailed, ResolvedTrip, SkipCause};

/// Which timetable runs today and every trip on it
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let now = cli.source.now();
    let timetable = cli.source.source().load()?;
    let calendar = &timetable.calendar;
    let (service_type, trips) = resolve_day_detailed(&now, &timetable.schedule, calendar);

    println!(
        "{} from {}, {} ({}){}, {} trips",
        timetable.schedule.route_name,
        timetable.schedule.stop_name,
        now.date_naive(),
        service_type.label(),
        if calendar.is_holiday(&now) { ", holiday" } else { "" },
        trips.len()
    );
    for trip in &trips {
        match trip {
            ResolvedTrip::Resolved(candidate) if candidate.has_departed() => {
                println!("  {}  departed", candidate.trip);
            }
            ResolvedTrip::Resolved(candidate) => {
                println!("  {}  in {} min", candidate.trip, candidate.minutes_until());
            }
            ResolvedTrip::Skipped { trip, field, cause } => {
                let cause = match cause {
                    SkipCause::Unparseable(err) => err.to_string(),
                    SkipCause::NonexistentLocalTime => "no such local time".to_owned(),
                };
                println!("  {}  skipped, {} time: {}", trip, field, cause);
            }
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        error!("{}", err);
        process::exit(1);
    }
}
