#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless driver that plays a scripted arcade session and reports the
//! events the simulation published.

mod session;

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{ensure, Context, Result};
use arcade_core::GameConfig;
use clap::{Parser, ValueEnum};
use log::LevelFilter;

use crate::session::{Session, SessionOptions};

/// Command-line arguments accepted by the driver.
#[derive(Debug, Parser)]
#[command(about = "Run a headless arcade shooter session", version)]
struct Args {
    /// Number of fixed simulation ticks to run.
    #[arg(long, default_value_t = 3_600)]
    ticks: u32,
    /// Length of a tick in milliseconds.
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,
    /// TOML file overriding the built-in game configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the random seed of the configuration.
    #[arg(long)]
    seed: Option<u64>,
    /// Probability that a destroyed enemy drops a powerup.
    #[arg(long, default_value_t = 0.25)]
    drop_chance: f64,
    /// Verbosity of diagnostics written to stderr.
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,
}

/// Verbosity levels exposed on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => Self::Off,
            LogLevel::Error => Self::Error,
            LogLevel::Warn => Self::Warn,
            LogLevel::Info => Self::Info,
            LogLevel::Debug => Self::Debug,
            LogLevel::Trace => Self::Trace,
        }
    }
}

/// Entry point for the arcade command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.log_level.into())
        .format_timestamp(None)
        .init();

    ensure!(args.tick_ms > 0, "--tick-ms must be positive");
    ensure!(
        (0.0..=1.0).contains(&args.drop_chance),
        "--drop-chance must lie between 0 and 1"
    );

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let options = SessionOptions {
        tick: Duration::from_millis(args.tick_ms),
        drop_chance: args.drop_chance,
    };
    let mut session = Session::new(config, options);
    session.start();
    for _ in 0..args.ticks {
        session.tick();
    }

    print!("{}", session.summary());
    Ok(())
}

fn load_config(path: &Path) -> Result<GameConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse_config(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn parse_config(text: &str) -> Result<GameConfig> {
    Ok(toml::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_keeps_builtin_roster() {
        let config = parse_config(
            r#"
            seed = 7

            [difficulty]
            time_between_waves_sec = 1.5
            boss_wave_frequency = 0
            "#,
        )
        .expect("valid config");

        assert_eq!(config.seed, 7);
        assert_eq!(config.difficulty.time_between_waves_sec, 1.5);
        assert_eq!(config.difficulty.boss_wave_frequency, 0);
        assert_eq!(config.enemies, GameConfig::default().enemies);
        assert!(config.weapon("blaster").is_some());
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(parse_config("seed = \"many\"").is_err());
    }

    #[test]
    fn log_levels_map_to_filters() {
        assert_eq!(LevelFilter::from(LogLevel::Off), LevelFilter::Off);
        assert_eq!(LevelFilter::from(LogLevel::Debug), LevelFilter::Debug);
    }
}
