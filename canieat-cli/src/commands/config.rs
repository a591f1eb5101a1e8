//! `canieat config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use canieat_allergen_scanner::{AllergenScanner, AllergenScannerConfig};
use canieat_core::config::CanIEatConfig;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::context::load_config;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `config` command.
pub async fn execute(
    args: ConfigArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(config_path, writer).await,
        ConfigAction::Show { section } => execute_show(config_path, section, writer).await,
    }
}

/// Execute the config validate subcommand.
///
/// Loads and validates the configuration file, then loads the configured
/// datasets so that a broken `catalog.dataset_dir` is reported as well.
///
/// # Errors
///
/// Returns `CliError::Config` if validation fails (parse errors, invalid values, bad datasets).
async fn execute_validate(config_path: &Path, writer: &OutputWriter) -> Result<(), CliError> {
    info!(path = %config_path.display(), "validating configuration");

    let report = validate_config(config_path).await;
    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }

    Ok(())
}

/// Validate the config file and the datasets it points at.
pub async fn validate_config(config_path: &Path) -> ConfigValidationReport {
    let source = config_path.display().to_string();

    let errors = match load_config(config_path).await {
        Ok(config) => {
            match AllergenScanner::load(AllergenScannerConfig::from_core(&config.catalog)).await {
                Ok(_) => Vec::new(),
                Err(e) => vec![e.to_string()],
            }
        }
        Err(e) => vec![e.to_string()],
    };

    ConfigValidationReport {
        source,
        valid: errors.is_empty(),
        errors,
    }
}

/// Execute the config show subcommand.
///
/// Loads and displays the effective configuration (file + env overrides + defaults).
///
/// # Errors
///
/// Returns `CliError::Core` if loading fails or `CliError::Command` if section name is invalid.
async fn execute_show(
    config_path: &Path,
    section: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    info!(path = %config_path.display(), "loading configuration");

    let config = load_config(config_path).await?;
    let report = build_config_report(config_path, &config, section)?;
    writer.render(&report)?;

    Ok(())
}

/// Serialize the whole config or a single section back to TOML.
pub fn build_config_report(
    config_path: &Path,
    config: &CanIEatConfig,
    section: Option<String>,
) -> Result<ConfigReport, CliError> {
    let config_toml = match section.as_deref() {
        None => toml::to_string_pretty(config),
        Some("general") => toml::to_string_pretty(&config.general),
        Some("catalog") => toml::to_string_pretty(&config.catalog),
        Some("profile") => toml::to_string_pretty(&config.profile),
        Some(other) => {
            return Err(CliError::Command(format!(
                "unknown section: {} (expected: general, catalog, profile)",
                other
            )));
        }
    }
    .unwrap_or_else(|e| format!("(serialization error: {})", e));

    Ok(ConfigReport {
        source: config_path.display().to_string(),
        section,
        config_toml,
    })
}

/// Configuration display report.
///
/// Contains the source file path and serialized TOML configuration.
/// The `config_toml` field is skipped during JSON serialization (only used for text rendering).
#[derive(Serialize)]
pub struct ConfigReport {
    /// Configuration file path
    pub source: String,
    /// Optional section name (None = full config)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Serialized TOML configuration
    #[serde(skip)]
    pub config_toml: String,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if let Some(ref section) = self.section {
            let section_label = format!("[{}]", section);
            writeln!(
                w,
                "Configuration {} (source: {})",
                section_label.bold(),
                self.source
            )?;
        } else {
            writeln!(w, "Configuration (source: {})", self.source.bold())?;
        }

        writeln!(w)?;
        write!(w, "{}", self.config_toml)?;

        Ok(())
    }
}

/// Configuration validation report.
///
/// Contains validation result and any error messages encountered.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    /// Configuration file path
    pub source: String,
    /// Whether the configuration is valid
    pub valid: bool,
    /// Validation error messages (empty if valid)
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Config Validation: {}", self.source.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }

        Ok(())
    }
}
