//! NumberPicker: draw random numbers from a range with include/exclude filters.
//! If `--count` is given, draws headless and exits; otherwise starts the interactive console.

use anyhow::Context;
use clap::Parser;
use number_picker::candidates::FilterMode;
use number_picker::draw::ThreadRngSource;
use number_picker::session::{Command, Session, SessionError, Settings};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "NumberPicker")]
#[command(about = "Draw random numbers from a range with include/exclude filters")]
struct Cli {
    #[arg(long, default_value_t = 1, env = "PICKER_START")]
    start: u64,
    #[arg(long, default_value_t = 10, env = "PICKER_END")]
    end: u64,
    #[arg(long, value_enum, default_value_t = FilterMode::None)]
    mode: FilterMode,
    /// Numbers or spans such as "1,3 5-7"
    #[arg(long, default_value = "")]
    filter: String,
    /// Draw this many numbers and exit
    #[arg(long)]
    count: Option<usize>,
    #[arg(long)]
    json: bool,
    #[arg(long, default_value_t = 32, env = "PICKER_CACHE_CAPACITY")]
    cache_capacity: usize,
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "number_picker=debug" } else { "number_picker=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn run_headless(cli: &Cli, count: usize) -> anyhow::Result<bool> {
    let mut session = Session::new(Settings {
        default_start: cli.start,
        default_end: cli.end,
        cache_capacity: cli.cache_capacity,
    });
    session.enqueue(Command::SetRange {
        start: cli.start,
        end: cli.end,
    });
    session.enqueue(Command::SetMode(cli.mode));
    if cli.mode != FilterMode::None {
        session.enqueue(Command::SetFilter(cli.filter.clone()));
    }
    session.apply_pending().context("invalid range or filter")?;

    let mut drawn = Vec::with_capacity(count);
    let mut failed = false;
    for _ in 0..count {
        match session.draw(&ThreadRngSource) {
            Ok(n) => drawn.push(n),
            Err(e @ SessionError::Draw(_)) => {
                eprintln!("Error: {}", e);
                failed = true;
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    if cli.json {
        let report = session.report(drawn);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for n in &drawn {
            println!("{}", n);
        }
    }
    Ok(!failed)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Some(count) = cli.count {
        let ok = run_headless(&cli, count)?;
        if !ok {
            std::process::exit(1);
        }
        return Ok(());
    }

    let settings = Settings {
        default_start: cli.start,
        default_end: cli.end,
        cache_capacity: cli.cache_capacity,
    };
    settings.validate().context("invalid range")?;
    number_picker::run(settings)
}
