use clap::Parser;
use log::*;
#[cfg(debug_assertions)]
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::{
    append::rolling_file::{
        RollingFileAppender,
        policy::compound::{
            CompoundPolicy, roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger,
        },
    },
    config::{Appender, Config as LogConfig, Logger, Root},
    encode::pattern::PatternEncoder,
};
use scoreboard::{
    config::{Config, Game},
    controller::{ControllerError, GameController},
    game_manager::{GameManager, command::Command},
};
use serde_json::json;
use std::path::PathBuf;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    time::Duration,
};

const APP_NAME: &str = "scoreboard";

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(long, short, action(clap::ArgAction::Count))]
    /// Increase the log verbosity
    verbose: u8,

    #[clap(long)]
    /// TOML file with the rules of play, overrides the rules in the config file
    rules: Option<PathBuf>,

    #[clap(long)]
    /// Milliseconds between clock ticks, overrides the config file
    tick_interval_ms: Option<u64>,

    #[clap(long)]
    /// Directory within which log files will be placed, default is platform dependent
    log_location: Option<PathBuf>,

    #[clap(long, default_value = "5000000")]
    /// Max size in bytes that a log file is allowed to reach before being rolled over
    log_max_file_size: u64,

    #[clap(long, default_value = "3")]
    /// Number of archived logs to keep
    num_old_logs: u32,
}

fn init_logging(args: &Cli) {
    let log_level = match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let log_base_path = args.log_location.clone().unwrap_or_else(|| {
        let mut path = directories::BaseDirs::new()
            .expect("Could not find a directory to store logs")
            .data_local_dir()
            .to_path_buf();
        path.push("scoreboard-logs");
        path
    });
    let mut log_path = log_base_path.clone();
    let mut archived_log_path = log_base_path;
    log_path.push(format!("{APP_NAME}-log.txt"));
    archived_log_path.push(format!("{APP_NAME}-log-{{}}.txt.gz"));

    // Only log to the console in debug mode, stdout belongs to the command console
    #[cfg(debug_assertions)]
    let console = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("[{d} {h({l:5})} {M}] {m}{n}")))
        .build();

    let roller = FixedWindowRoller::builder()
        .build(
            archived_log_path
                .to_str()
                .expect("Log path is not valid unicode"),
            args.num_old_logs,
        )
        .expect("Failed to set up the log roller");
    let file_policy = CompoundPolicy::new(
        Box::new(SizeTrigger::new(args.log_max_file_size)),
        Box::new(roller),
    );
    let file_appender = RollingFileAppender::builder()
        .append(true)
        .encoder(Box::new(PatternEncoder::new("[{d} {l:5} {M}] {m}{n}")))
        .build(&log_path, Box::new(file_policy))
        .expect("Failed to open the log file");

    // Everything outside the scoreboard only logs errors
    let root = Root::builder().appender("file_appender");
    #[cfg(debug_assertions)]
    let root = root.appender("console");
    let root = root.build(LevelFilter::Error);

    let log_config = LogConfig::builder()
        .appender(Appender::builder().build("file_appender", Box::new(file_appender)));

    #[cfg(debug_assertions)]
    let log_config = log_config.appender(Appender::builder().build("console", Box::new(console)));

    let log_config = log_config
        .logger(Logger::builder().build(APP_NAME, log_level))
        .build(root)
        .expect("Invalid logging config");

    log4rs::init_config(log_config).expect("Failed to initialize logging");
    log_panics::init();

    #[cfg(debug_assertions)]
    eprintln!("Log path: {}", log_path.display());
}

fn load_config(args: &Cli) -> Config {
    match confy::get_configuration_file_path(APP_NAME, None) {
        Ok(path) => info!("Reading config file from {path:?}"),
        Err(e) => warn!("Could not determine the config file location: {e}"),
    }

    let mut config: Config = match confy::load(APP_NAME, None) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file, overwriting with default. Error: {e}");
            let config = Config::default();
            if let Err(e) = confy::store(APP_NAME, None, &config) {
                error!("Failed to write the default config file: {e}");
            }
            config
        }
    };

    if let Some(ref rules) = args.rules {
        match Game::new_from_file(rules) {
            Ok(game) => {
                info!("Using the rules in {rules:?}");
                config.game = game;
            }
            Err(e) => warn!("Ignoring the rules file {rules:?}: {e}"),
        }
    }

    if let Some(tick_interval_ms) = args.tick_interval_ms {
        config.timing.tick_interval_ms = tick_interval_ms;
    }

    config
}

/// Turns one console line into the JSON reply. Returns `None` when the console should close.
async fn handle_line(controller: &GameController, line: &str) -> Option<serde_json::Value> {
    match line {
        "quit" | "exit" => None,
        "state" => Some(json!({ "state": controller.get_state() })),
        _ => Some(match Command::from_json(line) {
            Ok(command) => match controller.submit_command(command).await {
                Ok(outcome) => json!({ "state": outcome.snapshot, "events": outcome.events }),
                Err(ControllerError::Rejected(e)) => json!({ "error": e.to_string() }),
                Err(e) => {
                    error!("{e}");
                    return None;
                }
            },
            Err(e) => json!({ "error": e.to_string() }),
        }),
    }
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();
    init_logging(&args);
    info!("Starting Scoreboard");

    let config = load_config(&args);
    let tick_interval: Duration = config.timing.tick_interval();
    debug!("Ticking every {tick_interval:?}");

    let manager = GameManager::new(config.game, &config.teams);
    info!(
        "Starting in {} with the game clock at {}",
        manager.current_period(),
        manager.generate_snapshot().game_clock
    );
    let controller = GameController::new(manager, tick_interval);

    let mut events = controller.subscribe_all();
    let event_printer = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{line}"),
                Err(e) => error!("Failed to serialize {event:?}: {e}"),
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match handle_line(&controller, line).await {
            Some(reply) => println!("{reply}"),
            None => break,
        }
    }

    info!("Shutting down");
    drop(controller);
    event_printer.await?;

    Ok(())
}
