use clap::Parser;
use log::error;
use std::error::Error;
use std::process;
use std::time::Duration;

use bus_board::board::{Board, BoardState};
use bus_board::cli::SourceArgs;
use timetable_search::DEFAULT_LIMIT;

/// The next few buses leaving the stop today
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    /// How many departures to show
    #[arg(long, short = 'n', default_value_t = DEFAULT_LIMIT)]
    limit: usize,

    /// Print the board as JSON
    #[arg(long)]
    json: bool,

    /// Keep running, redrawing the board every this many seconds
    #[arg(long, value_name = "SECS")]
    watch: Option<u64>,
}

fn render(cli: &Cli) -> Result<Board, Box<dyn Error>> {
    let now = cli.source.now();
    let loaded = cli.source.source().load();
    if let Err(err) = &loaded {
        error!("{}", err);
    }
    let board = Board::from_load(loaded.as_ref(), &now, cli.limit);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&board)?);
    } else {
        println!("{}", board);
    }
    Ok(board)
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let watch = match cli.watch {
        Some(secs) if secs > 0 => Duration::from_secs(secs),
        _ => {
            let board = render(&cli)?;
            if let BoardState::Unavailable { .. } = board.state {
                process::exit(2);
            }
            return Ok(());
        }
    };
    // the timetable is reloaded every time so that edits to the config are picked up
    let mut interval = tokio::time::interval(watch);
    loop {
        interval.tick().await;
        render(&cli)?;
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        error!("{}", err);
        process::exit(1);
    }
}
