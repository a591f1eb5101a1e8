//! `canieat scan` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use canieat_allergen_scanner::{AllergenScanner, ScanOutcome, UserProfile};
use canieat_core::types::SafetyStatus;

use crate::cli::ScanArgs;
use crate::context::AppContext;
use crate::error::CliError;
use crate::output::{OutputWriter, Render, write_list};

/// Execute the `scan` command.
///
/// Renders the verdict, then maps it to the exit status: unsafe products
/// return `CliError::Unsafe` (exit 4), unknown barcodes `CliError::NotFound` (exit 3).
pub async fn execute(
    args: ScanArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let ctx = AppContext::open(config_path).await?;
    let profile = ctx.store.current().await;

    info!(barcode = %args.barcode, allergens = profile.allergens.len(), "checking product");
    let outcome = ctx.scanner.check_barcode(&args.barcode, &profile);
    let report = build_scan_report(&ctx.scanner, &profile, outcome);

    writer.render(&report)?;
    verdict(&report)
}

/// Assemble the product screen from a scan outcome.
pub fn build_scan_report(
    scanner: &AllergenScanner,
    profile: &UserProfile,
    outcome: ScanOutcome,
) -> ScanReport {
    let catalog = scanner.catalog();

    let (allergen_warnings, flagged_names) = match &outcome {
        ScanOutcome::Found { product, analysis } => {
            let warnings = product
                .allergen_warnings
                .iter()
                .map(|id| WarningEntry {
                    id: id.clone(),
                    name: catalog.display_name(id).to_owned(),
                    yours: profile.has_allergen(id),
                })
                .collect();
            // unresolved ids fall back to the raw id on the card
            let names = analysis
                .direct_matches
                .iter()
                .map(|id| catalog.display_name(id).to_owned())
                .collect();
            (warnings, names)
        }
        ScanOutcome::NotFound { .. } => (Vec::new(), Vec::new()),
    };

    ScanReport {
        outcome,
        allergen_warnings,
        flagged_names,
        profile_empty: profile.allergens.is_empty(),
    }
}

/// Map a rendered report to the command result.
pub fn verdict(report: &ScanReport) -> Result<(), CliError> {
    match &report.outcome {
        ScanOutcome::NotFound { code } => Err(CliError::NotFound(code.clone())),
        ScanOutcome::Found { analysis, .. } if analysis.safety_status == SafetyStatus::Unsafe => {
            Err(CliError::Unsafe(report.flagged_names.join(", ")))
        }
        ScanOutcome::Found { .. } => Ok(()),
    }
}

/// Product screen: outcome plus the warning list with the user's allergens flagged.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    #[serde(flatten)]
    pub outcome: ScanOutcome,
    pub allergen_warnings: Vec<WarningEntry>,
    #[serde(skip)]
    pub flagged_names: Vec<String>,
    #[serde(skip)]
    pub profile_empty: bool,
}

/// A declared allergen warning on the product.
#[derive(Serialize)]
pub struct WarningEntry {
    pub id: String,
    pub name: String,
    /// Whether the allergen is in the user's profile.
    pub yours: bool,
}

impl Render for ScanReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let (product, analysis) = match &self.outcome {
            ScanOutcome::Found { product, analysis } => (product, analysis),
            ScanOutcome::NotFound { code } => {
                writeln!(w, "{}", "Product Not Found".red().bold())?;
                writeln!(w, "We couldn't find this product in our database.")?;
                writeln!(w, "Barcode: {}", code)?;
                return Ok(());
            }
        };

        writeln!(w, "{}", product.name.bold())?;
        writeln!(w, "{}", product.brand.dimmed())?;
        writeln!(w)?;

        let badge = format!(" {} ", analysis.safety_status.label());
        let badge = match analysis.safety_status {
            SafetyStatus::Safe => badge.black().on_green().bold(),
            SafetyStatus::Caution => badge.black().on_yellow().bold(),
            SafetyStatus::Unsafe => badge.white().on_red().bold(),
        };
        writeln!(w, "{}", badge)?;
        writeln!(w)?;

        let headline = analysis.safety_status.headline();
        let headline = match analysis.safety_status {
            SafetyStatus::Safe => headline.green().bold(),
            SafetyStatus::Caution => headline.yellow().bold(),
            SafetyStatus::Unsafe => headline.red().bold(),
        };
        writeln!(w, "{}", headline)?;
        writeln!(w, "{}", analysis.safety_status.advice(&self.flagged_names))?;
        if !analysis.potential_matches.is_empty() {
            writeln!(
                w,
                "Found in ingredients: {}",
                analysis.potential_matches.join(", ").yellow()
            )?;
        }
        if self.profile_empty {
            writeln!(
                w,
                "{}",
                "Your profile has no allergens yet. Add some with `canieat profile add-allergen <ID>`."
                    .dimmed()
            )?;
        }
        writeln!(w)?;

        write_list(w, "Ingredients", &product.ingredients, "No ingredients listed.")?;
        writeln!(w)?;

        writeln!(w, "{}", "Allergen Warnings".bold())?;
        if self.allergen_warnings.is_empty() {
            writeln!(
                w,
                "  {}",
                "No allergen warnings listed for this product.".dimmed()
            )?;
        } else {
            for warning in &self.allergen_warnings {
                if warning.yours {
                    writeln!(w, "  {} {}", "!".red().bold(), warning.name.red().bold())?;
                } else {
                    writeln!(w, "  • {}", warning.name)?;
                }
            }
        }
        writeln!(w)?;

        writeln!(w, "Barcode: {}", product.barcode)?;

        Ok(())
    }
}
