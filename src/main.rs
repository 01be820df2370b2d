//! rdpkeyb - RDP keyboard event replay
//!
//! Reads keyboard input messages as JSON lines, runs them through a keyboard
//! session backed by a simulated device and writes the resulting local key
//! transitions as JSON lines.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rdpkeyb::config::{Config, LoggingConfig};
use rdpkeyb::input::error::is_recoverable;
use rdpkeyb::input::{
    ClientLayoutInfo, InputDispatcher, InputMessage, KeyFlag, KeyFlags, KeyTransition, LockFlags,
    LockKey, RdpKeyboard, SimulatedDevice,
};

/// Command-line arguments for rdpkeyb
#[derive(Parser, Debug)]
#[command(name = "rdpkeyb")]
#[command(version, about = "Replay RDP keyboard events through the scancode translator", long_about = None)]
pub struct Args {
    /// Input file with one JSON event per line ("-" for stdin)
    #[arg(default_value = "-")]
    pub input: String,

    /// Configuration file path
    #[arg(short, long, env = "RDPKEYB_CONFIG")]
    pub config: Option<String>,

    /// Write transitions to file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Verbose logging (can be specified multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log format (json|pretty|compact)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Write logs to file (in addition to stderr)
    #[arg(long)]
    pub log_file: Option<String>,
}

/// One line of the replay stream
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ReplayEvent {
    KeyDown {
        scancode: u16,
        #[serde(default)]
        extended: bool,
        #[serde(default)]
        special: bool,
    },
    KeyUp {
        scancode: u16,
        #[serde(default)]
        extended: bool,
        #[serde(default)]
        special: bool,
    },
    Sync {
        #[serde(default)]
        caps_lock: bool,
        #[serde(default)]
        num_lock: bool,
        #[serde(default)]
        scroll_lock: bool,
    },
    Layout(ClientLayoutInfo),
    Raw {
        msg: i32,
        #[serde(default)]
        param1: i64,
        #[serde(default)]
        param2: i64,
        #[serde(default)]
        param3: i64,
        #[serde(default)]
        param4: i64,
    },
}

fn key_flags(extended: bool, special: bool) -> KeyFlags {
    let mut flags = KeyFlags::empty();
    if extended {
        flags |= KeyFlag::Extended;
    }
    if special {
        flags |= KeyFlag::Special;
    }
    flags
}

/// A transition tagged with the line that produced it
#[derive(Debug, Serialize)]
struct OutputRecord {
    line: usize,
    #[serde(flatten)]
    transition: KeyTransition,
}

type ReplayDispatcher = InputDispatcher<SimulatedDevice, SimulatedDevice, SimulatedDevice>;

fn dispatch_event(dispatcher: &mut ReplayDispatcher, event: ReplayEvent) -> rdpkeyb::input::Result<()> {
    let message = match event {
        ReplayEvent::KeyDown {
            scancode,
            extended,
            special,
        } => InputMessage::KeyDown {
            scancode,
            flags: key_flags(extended, special),
        },
        ReplayEvent::KeyUp {
            scancode,
            extended,
            special,
        } => InputMessage::KeyUp {
            scancode,
            flags: key_flags(extended, special),
        },
        ReplayEvent::Sync {
            caps_lock,
            num_lock,
            scroll_lock,
        } => {
            let mut locks = LockFlags::empty();
            if caps_lock {
                locks |= LockKey::CapsLock;
            }
            if num_lock {
                locks |= LockKey::NumLock;
            }
            if scroll_lock {
                locks |= LockKey::ScrollLock;
            }
            InputMessage::Synchronize { locks }
        }
        ReplayEvent::Layout(client) => InputMessage::LayoutReload(client),
        ReplayEvent::Raw {
            msg,
            param1,
            param2,
            param3,
            param4,
        } => return dispatcher.dispatch_raw(msg, param1, param2, param3, param4),
    };
    dispatcher.dispatch(message)
}

fn replay<R: BufRead, W: Write>(config: &Config, input: R, mut output: W) -> Result<usize> {
    let device = SimulatedDevice::with_locks(config.replay.initial_locks());
    let keyboard = RdpKeyboard::new(device.clone(), device.clone());
    let mut dispatcher = InputDispatcher::new(keyboard, device.clone(), config.keyboard.to_layout());

    let mut emitted = 0;
    for (index, line) in input.lines().enumerate() {
        let line_no = index + 1;
        let line = line.context("Failed to read input")?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let event: ReplayEvent = serde_json::from_str(trimmed)
            .with_context(|| format!("Invalid event on line {}", line_no))?;
        debug!("Line {}: {:?}", line_no, event);

        if let Err(e) = dispatch_event(&mut dispatcher, event) {
            if !is_recoverable(&e) {
                return Err(e).with_context(|| format!("Failed to process line {}", line_no));
            }
            warn!("Skipping line {}: {}", line_no, e);
        }

        for transition in device.take_transitions() {
            let record = OutputRecord {
                line: line_no,
                transition,
            };
            serde_json::to_writer(&mut output, &record).context("Failed to write output")?;
            writeln!(output).context("Failed to write output")?;
            emitted += 1;
        }
    }

    output.flush().context("Failed to write output")?;

    let held = device.pressed_keys();
    if !held.is_empty() {
        warn!("Keys still held at end of input: {:?}", held);
    }

    Ok(emitted)
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration before logging so its level applies
    let loaded = args.config.as_deref().map(Config::load);
    let (config, config_error) = match loaded {
        Some(Ok(config)) => (config, None),
        Some(Err(e)) => (Config::default_config()?, Some(e)),
        None => (Config::default_config()?, None),
    };
    let config = config.with_overrides(None, args.log_format.clone());

    init_logging(&args, &config.logging)?;

    info!("rdpkeyb v{}", env!("CARGO_PKG_VERSION"));
    debug!("Built {}, commit {}", env!("BUILD_DATE"), env!("GIT_HASH"));

    if let Some(e) = config_error {
        warn!("Failed to load config: {:#}, using defaults", e);
    }
    debug!("Config: {:?}", config);

    let result = run(&args, &config);
    if let Err(e) = &result {
        eprintln!("{}", rdpkeyb::utils::format_user_error(e));
    }
    result
}

fn run(args: &Args, config: &Config) -> Result<()> {
    let input: Box<dyn BufRead> = if args.input == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(&args.input)
            .with_context(|| format!("Failed to open input file: {}", args.input))?;
        Box::new(BufReader::new(file))
    };

    let output: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create output file: {}", path))?,
        )),
        None => Box::new(BufWriter::new(io::stdout())),
    };

    let emitted = replay(config, input, output)?;
    info!("Replay finished, {} transitions emitted", emitted);
    Ok(())
}

fn init_logging(args: &Args, logging: &LoggingConfig) -> Result<()> {
    let log_level = match args.verbose {
        0 => logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("rdpkeyb={level},warn", level = log_level))
    });

    let log_file = args
        .log_file
        .clone()
        .or_else(|| logging.log_file.as_ref().map(|p| p.display().to_string()));

    // Stdout carries the transition stream, so logs go to stderr
    if let Some(log_file_path) = &log_file {
        let file = File::create(log_file_path)
            .with_context(|| format!("Failed to create log file: {}", log_file_path))?;

        match logging.format.as_str() {
            "json" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_writer(io::stderr),
                    )
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_writer(file)
                            .with_ansi(false),
                    )
                    .init();
            }
            "compact" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_writer(io::stderr),
                    )
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_writer(file)
                            .with_ansi(false),
                    )
                    .init();
            }
            _ => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .pretty()
                            .with_writer(io::stderr),
                    )
                    .with(
                        tracing_subscriber::fmt::layer()
                            .with_writer(file)
                            .with_ansi(false),
                    )
                    .init();
            }
        }
        info!("Logging to file: {}", log_file_path);
    } else {
        match logging.format.as_str() {
            "json" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(tracing_subscriber::fmt::layer().json().with_writer(io::stderr))
                    .init();
            }
            "compact" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(tracing_subscriber::fmt::layer().compact().with_writer(io::stderr))
                    .init();
            }
            _ => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(tracing_subscriber::fmt::layer().pretty().with_writer(io::stderr))
                    .init();
            }
        }
    }

    Ok(())
}
