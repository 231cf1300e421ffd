//! Touchpad Replay
//!
//! Plays a timed gesture script through the touch input layer and logs
//! every key the game would have received.

mod replay;
mod script;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use touchpad_config::TouchpadConfig;
use touchpad_input::ReleasePolicy;
use tracing::{info, warn};

use crate::script::Script;

#[derive(Debug, Parser)]
#[command(name = "touchpad-replay")]
#[command(about = "Replay a touch gesture script against the key mapping")]
struct Cli {
    /// Configuration file (defaults to the user, then system config)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Gesture script to replay
    #[arg(long)]
    script: PathBuf,

    /// Override the configured release policy
    #[arg(long, value_enum)]
    policy: Option<PolicyArg>,

    /// Rebind a control before replaying, e.g. `--bind a=L`
    #[arg(long = "bind", value_name = "CONTROL=KEY")]
    bindings: Vec<String>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PolicyArg {
    Overlapping,
    Retrigger,
}

impl From<PolicyArg> for ReleasePolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Overlapping => ReleasePolicy::Overlapping,
            PolicyArg::Retrigger => ReleasePolicy::Retrigger,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    setup_logging();

    let config = load_config(&cli)?;
    let script = Script::load(&cli.script)?;
    let events = script.events(config.controls.min_power)?;

    let summary = replay::replay(&config, events).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "{} events, {} releases, {} flushed at exit, {} key calls",
            summary.events, summary.releases, summary.flushed, summary.key_calls
        );
    }

    if summary.stuck.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        warn!("Keys still held after replay: {}", summary.stuck.join(", "));
        Ok(ExitCode::FAILURE)
    }
}

fn load_config(cli: &Cli) -> Result<TouchpadConfig> {
    let mut config = match &cli.config {
        Some(path) => TouchpadConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => TouchpadConfig::load_default()?,
    };

    for binding in &cli.bindings {
        let (control, key) = binding
            .split_once('=')
            .with_context(|| format!("Binding '{}' is not CONTROL=KEY", binding))?;
        config
            .set_binding(control, key)
            .with_context(|| format!("Invalid binding '{}'", binding))?;
    }

    if let Some(policy) = cli.policy {
        config.controls.release_policy = policy.into();
    }

    config.validate()?;
    info!(
        "Release policy {}, delay {} ms",
        config.controls.release_policy, config.controls.release_delay_ms
    );
    Ok(config)
}

/// Setup logging to the console
fn setup_logging() {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use touchpad_input::KeyCode;

    fn parse_args(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("touchpad-replay").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_overrides() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[controls]\nrelease_delay_ms = 20\n").unwrap();
        let path = file.path().to_str().unwrap();

        let cli = parse_args(&[
            "--config", path, "--script", "steps.toml", "--policy", "retrigger", "--bind", "a=L",
        ]);
        let config = load_config(&cli).unwrap();

        assert_eq!(config.controls.release_delay_ms, 20);
        assert_eq!(config.controls.release_policy, ReleasePolicy::Retrigger);
        assert_eq!(config.keymap.a, KeyCode::from_name("L").unwrap());
    }

    #[test]
    fn test_bad_binding() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "").unwrap();
        let path = file.path().to_str().unwrap();

        let cli = parse_args(&["--config", path, "--script", "s.toml", "--bind", "a"]);
        assert!(load_config(&cli).is_err());

        let cli = parse_args(&["--config", path, "--script", "s.toml", "--bind", "up=W"]);
        // Same key it already had
        assert!(load_config(&cli).is_ok());

        let cli = parse_args(&["--config", path, "--script", "s.toml", "--bind", "up=D"]);
        assert!(load_config(&cli).is_err());

        // A button may not take a stick key
        let cli = parse_args(&["--config", path, "--script", "s.toml", "--bind", "a=D"]);
        assert!(load_config(&cli).is_err());
    }
}
