//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Default configuration path. A missing file at this path means "use defaults".
pub const DEFAULT_CONFIG_PATH: &str = "canieat.toml";

/// CanIEat -- check packaged food against your allergen profile.
///
/// Use `canieat <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "canieat", version, about, long_about = None)]
pub struct Cli {
    /// Path to the canieat.toml configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Look up a barcode and check it against your profile.
    Scan(ScanArgs),

    /// View or edit your allergen profile.
    Profile(ProfileArgs),

    /// Browse the allergen catalog and symptom guides.
    Allergens(AllergensArgs),

    /// Browse the product table.
    Products(ProductsArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- scan ----

/// Look up a product by barcode and analyze it.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Barcode to look up (exact match).
    pub barcode: String,
}

// ---- profile ----

/// View or edit the stored allergen profile.
#[derive(Args, Debug)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub action: ProfileAction,
}

#[derive(Subcommand, Debug)]
pub enum ProfileAction {
    /// Show the stored profile.
    Show,
    /// Add one or more allergens by catalog id.
    AddAllergen {
        /// Allergen ids (see `canieat allergens list`).
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },
    /// Remove one or more allergens.
    RemoveAllergen {
        /// Allergen ids.
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },
    /// Add a dietary restriction (free text, e.g. "vegetarian").
    AddRestriction {
        /// Restriction text.
        restriction: String,
    },
    /// Remove a dietary restriction.
    RemoveRestriction {
        /// Restriction text.
        restriction: String,
    },
    /// Set personal details. An empty value clears the field.
    Set {
        /// Display name.
        #[arg(long)]
        name: Option<String>,
        /// Emergency contact.
        #[arg(long)]
        emergency_contact: Option<String>,
    },
    /// Clear all allergens and dietary restrictions.
    Clear,
}

// ---- allergens ----

/// Browse the allergen catalog.
#[derive(Args, Debug)]
pub struct AllergensArgs {
    #[command(subcommand)]
    pub action: AllergensAction,
}

#[derive(Subcommand, Debug)]
pub enum AllergensAction {
    /// List all allergens in the catalog.
    List,
    /// Show an allergen with its symptom guide.
    Show {
        /// Allergen id.
        id: String,
    },
}

// ---- products ----

/// Browse the product table.
#[derive(Args, Debug)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub action: ProductsAction,
}

#[derive(Subcommand, Debug)]
pub enum ProductsAction {
    /// List all known products with their verdict for your profile.
    List,
}

// ---- config ----

/// Manage canieat configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, catalog, profile).
        #[arg(long)]
        section: Option<String>,
    },
}
