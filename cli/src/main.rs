use anyhow::Context;
use clap::Parser;
use rand::{SeedableRng, rngs::SmallRng};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, Sender};
use std::thread;
use winmine_core::{BestTimes, Difficulty, GameConfig, Level};

mod app;
mod input;
mod interval;
mod render;
mod scores;
mod settings;
mod storage;

use app::{App, Event, Flow};
use settings::Settings;
use storage::Storage;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Preset to play: beginner, intermediate or expert
    #[arg(short, long, conflicts_with = "custom")]
    difficulty: Option<Difficulty>,

    /// Custom board as ROWSxCOLSxMINES
    #[arg(short, long, value_parser = parse_custom)]
    custom: Option<GameConfig>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Whether marking cycles through a question mark
    #[arg(long)]
    question_marks: Option<bool>,

    /// Keep settings and best times in this directory
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn parse_custom(text: &str) -> Result<GameConfig, input::CommandError> {
    input::parse_custom_level(text)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .parse_default_env()
        .init();
    log::debug!("seed: {:?}", args.seed);

    let storage = match &args.data_dir {
        Some(dir) => Some(Storage::in_dir(dir)),
        None => Storage::locate(),
    };
    if storage.is_none() {
        log::warn!("no user directories found, settings and best times will not be kept");
    }

    let mut settings: Settings = storage
        .as_ref()
        .map(Storage::load_or_default::<Settings>)
        .unwrap_or_default();
    let best_times: BestTimes = storage
        .as_ref()
        .map(Storage::load_or_default::<BestTimes>)
        .unwrap_or_default();
    if let Some(difficulty) = args.difficulty {
        settings.set_level(difficulty.into());
    }
    if let Some(config) = args.custom {
        settings.set_level(Level::Custom(config));
    }
    if let Some(enabled) = args.question_marks {
        settings.question_marks = enabled;
    }

    let seeds = match args.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };

    let (events, incoming) = mpsc::channel();
    spawn_input_reader(events.clone()).context("could not start the input reader")?;
    let mut app = App::new(settings, best_times, storage, seeds, events);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", input::HELP)?;
    app.render(&mut out)?;
    for event in incoming {
        if app.handle_event(event, &mut out)? == Flow::Quit {
            break;
        }
    }
    log::debug!("bye");
    Ok(())
}

fn spawn_input_reader(events: Sender<Event>) -> io::Result<()> {
    thread::Builder::new()
        .name("input".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        log::error!("could not read input: {}", err);
                        break;
                    }
                };
                if events.send(Event::Line(line)).is_err() {
                    return;
                }
            }
            let _ = events.send(Event::InputClosed);
        })?;
    Ok(())
}
