//! # Traffic Lights Binary
//!
//! Maps the GPIO registers, runs the seven-phase traffic-light sequence once
//! and switches every lamp off.
//!
//! # Usage
//!
//! ```bash
//! # Real hardware (needs access to /dev/mem)
//! sudo traffic_lights
//!
//! # Dry run against in-memory registers
//! traffic_lights --simulate -v
//! ```
//!
//! Unrecognised arguments are ignored; the sequence is the same for every
//! invocation.

use clap::{CommandFactory, Parser};
use signal_common::clock::SystemClock;
use signal_common::config::{ConfigError, ControllerConfig, LogLevel};
use signal_common::consts::DEFAULT_CONFIG_PATH;
use signal_controller::runner::{exit_status, run_once};
use signal_controller::sequence::RunReport;
use signal_hal::drivers::Backend;
use signal_hal::error::GpioError;
use std::path::PathBuf;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Traffic Lights Control - three LEDs and a pedestrian button on GPIO
#[derive(Parser, Debug)]
#[command(name = "traffic_lights")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Runs one traffic-light sequence on memory-mapped GPIO")]
#[command(long_about = None)]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Args {
    /// Path to the optional configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Use in-memory registers instead of /dev/mem
    #[arg(short = 's', long)]
    simulate: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            config: PathBuf::from(DEFAULT_CONFIG_PATH),
            simulate: false,
            verbose: false,
            json: false,
        }
    }
}

fn main() {
    let result = run();
    if let Err(e) = &result {
        error!("{}", e);
    }
    std::process::exit(exit_status(&result));
}

fn run() -> Result<RunReport, GpioError> {
    let args = parse_args();

    let (config, config_error) = match ControllerConfig::load_or_default(&args.config) {
        Ok(config) => (config, None),
        Err(e) => (ControllerConfig::default(), Some(e)),
    };

    setup_tracing(&args, config.shared.log_level);

    info!("Traffic Lights Control v{}", env!("CARGO_PKG_VERSION"));
    info!("==========================================");
    if let Some(e) = config_error {
        report_config_error(&args.config, &e);
    }
    info!(
        "Instance '{}', platform {:?}, GPIO base {:#x}",
        config.shared.service_name,
        config.hardware.platform,
        config.hardware.platform.gpio_base()
    );

    let backend = if args.simulate {
        Backend::Simulation
    } else {
        Backend::DevMem
    };

    let report = run_once(|| backend.open(&config.hardware), SystemClock)?;

    info!(
        "Ran {} phases in {:.1}s",
        report.phases.len(),
        report.total().as_secs_f64()
    );
    Ok(report)
}

fn parse_args() -> Args {
    parse_args_from(std::env::args())
}

/// Parse CLI arguments, dropping tokens that are not ours.
///
/// Unknown flags and stray positionals are removed before clap sees them, so
/// the recognised flags around them still take effect. `-h` and `-V` are not
/// flags here and never stop the sequence.
fn parse_args_from<I, T>(argv: I) -> Args
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let command = Args::command();
    let takes_value = |arg: &clap::Arg| arg.get_action().takes_values();
    let long = |name: &str| command.get_arguments().find(|a| a.get_long() == Some(name));
    let short = |c: char| command.get_arguments().find(|a| a.get_short() == Some(c));

    let mut tokens = argv.into_iter().map(Into::<String>::into);
    let mut kept: Vec<String> = tokens.next().into_iter().collect();

    while let Some(token) = tokens.next() {
        if let Some(body) = token.strip_prefix("--") {
            let (name, inline) = match body.split_once('=') {
                Some((name, _)) => (name, true),
                None => (body, false),
            };
            let Some(arg) = long(name) else { continue };
            let needs_value = takes_value(arg) && !inline;
            kept.push(token.clone());
            if needs_value {
                kept.extend(tokens.next());
            }
        } else if let Some(cluster) = token.strip_prefix('-').filter(|c| !c.is_empty()) {
            let mut chars = cluster.chars();
            let mut flags = String::from("-");
            let mut pending_value = None;
            while let Some(c) = chars.next() {
                let Some(arg) = short(c) else { continue };
                flags.push(c);
                if takes_value(arg) {
                    let rest: String = chars.by_ref().collect();
                    pending_value = Some(if rest.is_empty() {
                        tokens.next()
                    } else {
                        Some(rest)
                    });
                }
            }
            if flags.len() > 1 {
                kept.push(flags);
                if let Some(value) = pending_value {
                    kept.extend(value);
                }
            }
        }
    }

    Args::try_parse_from(kept).unwrap_or_default()
}

fn report_config_error(path: &std::path::Path, e: &ConfigError) {
    warn!("Ignoring config {:?}: {}. Using defaults.", path, e);
}

/// Setup tracing subscriber based on CLI arguments and config.
fn setup_tracing(args: &Args, configured: LogLevel) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        configured.as_tracing_level()
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stdout)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stdout)
            .with_target(false)
            .init();
    }
}
