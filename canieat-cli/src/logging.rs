//! Logging initialization for the canieat binary.
//!
//! Configures `tracing-subscriber` based on the `[general]` section
//! of `CanIEatConfig`. Supports JSON structured logging and
//! human-readable pretty format. Logs go to stderr so they never mix
//! with command output on stdout.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use canieat_core::config::GeneralConfig;

use crate::error::CliError;

/// Initialize the global tracing subscriber.
///
/// Must be called exactly once, before any tracing macros are used.
///
/// # Arguments
///
/// * `config` - General configuration (log_level, log_format)
/// * `level_override` - `--log-level` flag, takes precedence over the config
///
/// `RUST_LOG` takes precedence over both.
///
/// # Formats
///
/// * `"json"` - Machine-parseable JSON lines
/// * `"pretty"` - Human-readable colored output (default)
pub fn init_tracing(config: &GeneralConfig, level_override: Option<&str>) -> Result<(), CliError> {
    let level = effective_level(config, level_override);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match config.log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .map_err(|e| {
                    CliError::Command(format!(
                        "failed to initialize JSON tracing subscriber: {}",
                        e
                    ))
                })?;
        }
        "pretty" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(std::io::stderr),
                )
                .try_init()
                .map_err(|e| {
                    CliError::Command(format!(
                        "failed to initialize pretty tracing subscriber: {}",
                        e
                    ))
                })?;
        }
        _ => {
            return Err(CliError::Config(format!(
                "unknown log format '{}', expected 'json' or 'pretty'",
                config.log_format
            )));
        }
    }

    Ok(())
}

/// Level used when `RUST_LOG` is unset: the flag if given, else the config value.
pub fn effective_level<'a>(config: &'a GeneralConfig, level_override: Option<&'a str>) -> &'a str {
    level_override.unwrap_or(config.log_level.as_str())
}
