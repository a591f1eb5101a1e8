//! `canieat allergens` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use canieat_allergen_scanner::{AllergenScanner, SymptomGuide, UserProfile};
use canieat_core::types::{AllergenRecord, Severity};

use crate::cli::{AllergensAction, AllergensArgs};
use crate::context::AppContext;
use crate::error::CliError;
use crate::output::{OutputWriter, Render, write_list};

/// Execute the `allergens` command.
pub async fn execute(
    args: AllergensArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let ctx = AppContext::open(config_path).await?;
    let profile = ctx.store.current().await;

    match args.action {
        AllergensAction::List => {
            writer.render(&build_allergen_list(&ctx.scanner, &profile))?;
        }
        AllergensAction::Show { id } => {
            writer.render(&build_allergen_detail(&ctx.scanner, &profile, &id)?)?;
        }
    }
    Ok(())
}

/// List the catalog in dataset order, marking the user's selections.
pub fn build_allergen_list(scanner: &AllergenScanner, profile: &UserProfile) -> AllergenListReport {
    let allergens = scanner
        .catalog()
        .records()
        .iter()
        .map(|record| AllergenEntry {
            id: record.id.clone(),
            name: record.name.clone(),
            severity: record.severity,
            selected: profile.has_allergen(&record.id),
        })
        .collect();
    AllergenListReport { allergens }
}

/// Look up one allergen with its symptom guide.
pub fn build_allergen_detail(
    scanner: &AllergenScanner,
    profile: &UserProfile,
    id: &str,
) -> Result<AllergenDetailReport, CliError> {
    let allergen = scanner.catalog().get(id).cloned().ok_or_else(|| {
        CliError::Command(format!(
            "unknown allergen id: {} (see `canieat allergens list`)",
            id
        ))
    })?;

    Ok(AllergenDetailReport {
        selected: profile.has_allergen(id),
        symptoms: scanner.symptoms().get(id).cloned(),
        allergen,
    })
}

#[derive(Serialize)]
pub struct AllergenListReport {
    pub allergens: Vec<AllergenEntry>,
}

#[derive(Serialize)]
pub struct AllergenEntry {
    pub id: String,
    pub name: String,
    pub severity: Severity,
    /// In the user's profile
    pub selected: bool,
}

impl Render for AllergenListReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Allergens: {}", self.allergens.len())?;
        writeln!(w)?;
        writeln!(w, "    {:<12} {:<12} Severity", "ID", "Name")?;
        writeln!(w, "{}", "-".repeat(40))?;

        for a in &self.allergens {
            let marker = if a.selected {
                "[x]".green().bold()
            } else {
                "[ ]".normal()
            };
            writeln!(
                w,
                "{} {:<12} {:<12} {}",
                marker,
                a.id,
                a.name,
                severity_colored(a.severity)
            )?;
        }

        Ok(())
    }
}

/// Allergen detail with its symptom guide.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AllergenDetailReport {
    pub allergen: AllergenRecord,
    pub selected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symptoms: Option<SymptomGuide>,
}

impl Render for AllergenDetailReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let a = &self.allergen;
        writeln!(w, "{}", format!("{} Allergy", a.name).bold())?;
        writeln!(w, "{} Severity", severity_colored(a.severity))?;
        if self.selected {
            writeln!(w, "{}", "In your profile".green())?;
        }
        writeln!(w)?;
        writeln!(w, "{}", a.description)?;
        writeln!(w)?;

        match self.symptoms {
            Some(ref guide) => {
                write_list(w, "Common Symptoms", &guide.symptoms, "None listed.")?;
                writeln!(w)?;
                write_list(w, "First Aid", &guide.first_aid, "None listed.")?;
                writeln!(w)?;
                writeln!(w, "{}", "When to Seek Medical Help".red().bold())?;
                writeln!(
                    w,
                    "  If you experience any of the following symptoms, seek immediate medical attention:"
                )?;
                for item in &guide.when_to_seek_help {
                    writeln!(w, "  {} {}", "!".red(), item)?;
                }
            }
            None => {
                writeln!(
                    w,
                    "{}",
                    "We couldn't find symptom information for this allergen.".dimmed()
                )?;
            }
        }
        writeln!(w)?;

        write_list(w, "Also Known As", &a.aliases, "No other names.")?;
        writeln!(w)?;
        writeln!(
            w,
            "{}",
            "Disclaimer: This information is provided for educational purposes only and is not \
             intended to be a substitute for professional medical advice, diagnosis, or treatment."
                .dimmed()
        )?;

        Ok(())
    }
}

fn severity_colored(severity: Severity) -> colored::ColoredString {
    use colored::Colorize;

    let text = severity.to_string();
    match severity {
        Severity::High => text.red().bold(),
        Severity::Medium => text.yellow(),
        Severity::Low => text.normal(),
    }
}
