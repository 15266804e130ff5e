use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use tempo::config::Config;
use tempo::http::HttpClient;
use tempo::lessons::{self, LessonContext, Mode};
use tempo::RuntimeBuilder;
use tempo::output::Output;

#[derive(Debug, Parser)]
#[command(name = "tempo", version, about = "Asynchronous and object-modelling lessons")]
struct Cli {
    /// Log runtime and lesson activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to ./tempo.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Multiply every lesson delay by this factor
    #[arg(long, global = true, value_name = "FACTOR")]
    scale: Option<f64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run lessons (all of them when none is given)
    Run {
        /// Lesson numbers, 1 to 20
        lessons: Vec<u8>,

        /// Finish each lesson before starting the next
        #[arg(long)]
        sequential: bool,
    },
    /// List the lessons
    List,
}

fn main() -> tempo::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(scale) = cli.scale {
        config.timing.scale = scale;
        config.validate()?;
    }

    match cli.command.unwrap_or(Command::Run {
        lessons: Vec::new(),
        sequential: false,
    }) {
        Command::List => {
            for lesson in lessons::catalog() {
                println!("{:>2}  {}", lesson.number, lesson.title);
            }
            Ok(())
        }
        Command::Run {
            lessons: numbers,
            sequential,
        } => run(config, &numbers, sequential),
    }
}

fn run(config: Config, numbers: &[u8], sequential: bool) -> tempo::Result<()> {
    let selected = lessons::select(numbers)?;
    let mode = if sequential {
        Mode::Sequential
    } else {
        Mode::Concurrent
    };

    let runtime = RuntimeBuilder::new()
        .event_capacity(config.runtime.event_capacity)
        .tasks_per_tick(config.runtime.tasks_per_tick)
        .build()?;

    let fetch = Arc::new(HttpClient::new(config.http_timeout()));
    let cx = LessonContext::new(Output::console(), fetch, Arc::new(config));

    debug!(lessons = selected.len(), ?mode, "starting");
    runtime.block_on(lessons::run_lessons(selected, cx, mode));

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}
