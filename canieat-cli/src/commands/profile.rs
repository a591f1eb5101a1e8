//! `canieat profile` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use canieat_allergen_scanner::{AllergenCatalog, ProfileUpdate, UserProfile};

use crate::cli::{ProfileAction, ProfileArgs};
use crate::context::AppContext;
use crate::error::CliError;
use crate::output::{OutputWriter, Render, write_list};

/// Execute the `profile` command.
pub async fn execute(
    args: ProfileArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let ctx = AppContext::open(config_path).await?;
    let message = apply(args.action, &ctx).await?;

    let report = build_profile_report(
        ctx.scanner.catalog(),
        &ctx.store.current().await,
        ctx.store.is_first_launch().await,
        ctx.store.storage().path(),
        message,
    );
    writer.render(&report)?;
    Ok(())
}

/// Apply a profile action to the store. Returns a confirmation message for mutations.
pub async fn apply(action: ProfileAction, ctx: &AppContext) -> Result<Option<String>, CliError> {
    let store = &ctx.store;
    let catalog = ctx.scanner.catalog();

    let message = match action {
        ProfileAction::Show => None,
        ProfileAction::AddAllergen { ids } => {
            ctx.ensure_known_allergens(&ids)?;
            for id in &ids {
                store.add_allergen(id).await?;
            }
            info!(ids = ?ids, "allergens added");
            Some(format!("Added: {}", display_names(catalog, &ids)))
        }
        ProfileAction::RemoveAllergen { ids } => {
            for id in &ids {
                store.remove_allergen(id).await?;
            }
            info!(ids = ?ids, "allergens removed");
            Some(format!("Removed: {}", display_names(catalog, &ids)))
        }
        ProfileAction::AddRestriction { restriction } => {
            let restriction = non_empty_restriction(&restriction)?;
            store.add_dietary_restriction(restriction).await?;
            Some(format!("Added dietary restriction: {restriction}"))
        }
        ProfileAction::RemoveRestriction { restriction } => {
            let restriction = non_empty_restriction(&restriction)?;
            store.remove_dietary_restriction(restriction).await?;
            Some(format!("Removed dietary restriction: {restriction}"))
        }
        ProfileAction::Set {
            name,
            emergency_contact,
        } => {
            if name.is_none() && emergency_contact.is_none() {
                return Err(CliError::Command(
                    "nothing to set (use --name and/or --emergency-contact)".to_owned(),
                ));
            }
            store
                .update(ProfileUpdate {
                    name,
                    emergency_contact,
                    ..ProfileUpdate::default()
                })
                .await?;
            Some("Profile updated".to_owned())
        }
        ProfileAction::Clear => {
            store.clear().await?;
            info!("profile cleared");
            Some("Cleared all allergens and dietary restrictions".to_owned())
        }
    };

    Ok(message)
}

fn non_empty_restriction(restriction: &str) -> Result<&str, CliError> {
    let trimmed = restriction.trim();
    if trimmed.is_empty() {
        return Err(CliError::Command(
            "dietary restriction must not be empty".to_owned(),
        ));
    }
    Ok(trimmed)
}

fn display_names(catalog: &AllergenCatalog, ids: &[String]) -> String {
    ids.iter()
        .map(|id| catalog.display_name(id))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the profile view, resolving allergen ids against the catalog.
pub fn build_profile_report(
    catalog: &AllergenCatalog,
    profile: &UserProfile,
    first_launch: bool,
    storage_path: &Path,
    message: Option<String>,
) -> ProfileReport {
    let allergens = profile
        .allergens
        .iter()
        .map(|id| ProfileAllergen {
            id: id.clone(),
            name: catalog.display_name(id).to_owned(),
            known: catalog.contains(id),
        })
        .collect();

    ProfileReport {
        message,
        storage: storage_path.display().to_string(),
        first_launch,
        profile: profile.clone(),
        allergens,
    }
}

/// Stored profile view.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Profile record path
    pub storage: String,
    /// No profile has been saved yet
    pub first_launch: bool,
    pub profile: UserProfile,
    #[serde(skip)]
    pub allergens: Vec<ProfileAllergen>,
}

/// An allergen id from the profile with its catalog name.
pub struct ProfileAllergen {
    pub id: String,
    pub name: String,
    pub known: bool,
}

impl Render for ProfileReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if let Some(ref message) = self.message {
            writeln!(w, "{}", message.green())?;
            writeln!(w)?;
        }

        writeln!(w, "Profile (storage: {})", self.storage.bold())?;
        if self.first_launch {
            writeln!(
                w,
                "  {}",
                "No profile saved yet. Add allergens with `canieat profile add-allergen <ID>`."
                    .dimmed()
            )?;
        }
        if let Some(ref name) = self.profile.name {
            writeln!(w, "  Name: {}", name)?;
        }
        if let Some(ref contact) = self.profile.emergency_contact {
            writeln!(w, "  Emergency contact: {}", contact)?;
        }
        writeln!(w)?;

        writeln!(w, "{}", "Allergens".bold())?;
        if self.allergens.is_empty() {
            writeln!(w, "  {}", "None selected.".dimmed())?;
        }
        for allergen in &self.allergens {
            if allergen.known {
                writeln!(w, "  • {} ({})", allergen.name, allergen.id.dimmed())?;
            } else {
                writeln!(
                    w,
                    "  • {} {}",
                    allergen.id,
                    "(not in catalog)".yellow()
                )?;
            }
        }
        writeln!(w)?;

        write_list(
            w,
            "Dietary Restrictions",
            &self.profile.dietary_restrictions,
            "None.",
        )?;

        Ok(())
    }
}
