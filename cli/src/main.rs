use std::io::{self, BufRead, Write};

use anyhow::Context;
use clap::Parser;
use hintsweeper_core::{Coord, GameSession, HintAdvisor, HintKind};
use tracing_subscriber::filter::LevelFilter;
use web_time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crate::command::{Command, HELP};

mod command;
mod render;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Grid size preset: 4, 6 or 9
    #[arg(long, default_value_t = 4)]
    size: Coord,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,
}

fn init_logging(level: log::LevelFilter) {
    let level = match level {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    };
    // also installs the `log` bridge, the engine logs through `log`
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}

/// Feeds the session one tick per whole second of wall time since the last call.
fn pump_clock(session: &mut GameSession, last_tick: &mut Instant) {
    let whole_seconds = last_tick.elapsed().as_secs();
    for _ in 0..whole_seconds {
        session.tick();
    }
    *last_tick += Duration::from_secs(whole_seconds);
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose.log_level_filter());

    let seed = args.seed.unwrap_or_else(time_seed);
    log::debug!("seed: {}", seed);

    let mut session = GameSession::new(args.size, seed)
        .with_context(|| format!("cannot start a game of size {}", args.size))?;
    let mut advisor = HintAdvisor::from_seed(seed.rotate_left(32));
    let mut last_tick = Instant::now();

    let mut out = io::stdout().lock();
    writeln!(out, "{}", HELP)?;
    render::board(&mut out, session.board(), None)?;
    render::status(&mut out, &session)?;

    for line in io::stdin().lock().lines() {
        let line = line.context("reading stdin")?;
        pump_clock(&mut session, &mut last_tick);

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "{err:#}")?;
                continue;
            }
        };
        log::trace!("command: {:?}", command);

        let mut hint = None;
        let result = match command {
            Command::Reveal(coords) => session.reveal(coords).map(|report| {
                log::debug!(
                    "{:?}: {} revealed, {} changed",
                    report.outcome,
                    report.revealed_cells.len(),
                    report.changed_cells.len()
                );
                report.outcome.has_update()
            }),
            Command::Flag(coords) => session
                .toggle_flag(coords)
                .map(|report| report.outcome.has_update()),
            Command::Hint => {
                match advisor.suggest_for(&session) {
                    Some(suggestion) => {
                        let kind = match suggestion.kind {
                            HintKind::Safe => "safe",
                            HintKind::Guess => "a guess",
                        };
                        let (row, col) = suggestion.coords;
                        writeln!(out, "Hint: try {row} {col} ({kind})")?;
                        hint = Some(suggestion.coords);
                    }
                    None => writeln!(out, "No hint available")?,
                }
                Ok(true)
            }
            Command::New(size) => {
                let size = size.unwrap_or(session.size());
                session.reset(size).map(|_| true)
            }
            Command::Snapshot => {
                let json = serde_json::to_string_pretty(&session.snapshot())?;
                writeln!(out, "{json}")?;
                continue;
            }
            Command::Help => {
                writeln!(out, "{}", HELP)?;
                continue;
            }
            Command::Quit => break,
        };

        match result {
            Ok(true) => {}
            Ok(false) => {
                writeln!(out, "Nothing changed")?;
                continue;
            }
            Err(err) => {
                writeln!(out, "{err}")?;
                continue;
            }
        }

        render::board(&mut out, session.board(), hint)?;
        render::status(&mut out, &session)?;
    }

    Ok(())
}
