//! Shared command context: effective configuration, datasets and the profile store

use std::path::{Path, PathBuf};

use tracing::debug;

use canieat_allergen_scanner::{
    AllergenScanner, AllergenScannerConfig, JsonFileStorage, ProfileStore,
};
use canieat_core::config::{CanIEatConfig, GeneralConfig};

use crate::cli::DEFAULT_CONFIG_PATH;
use crate::error::CliError;

/// Subdirectory of the platform data directory used when `general.data_dir` is empty.
const APP_DIR_NAME: &str = "canieat";

/// Load the effective configuration.
///
/// A missing file at the default path falls back to defaults plus environment
/// overrides. An explicitly given path must exist.
pub async fn load_config(path: &Path) -> Result<CanIEatConfig, CliError> {
    let config = if path == Path::new(DEFAULT_CONFIG_PATH) {
        CanIEatConfig::load_or_default(path).await?
    } else {
        CanIEatConfig::load(path).await?
    };
    Ok(config)
}

/// Resolve the directory the profile record lives in.
///
/// An empty `data_dir` means the platform data directory
/// (e.g. `~/.local/share/canieat`); a leading `~/` expands to the home directory.
pub fn resolve_data_dir(general: &GeneralConfig) -> Result<PathBuf, CliError> {
    let configured = general.data_dir.trim();
    if configured.is_empty() {
        return dirs::data_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or_else(|| {
                CliError::Config(
                    "cannot determine platform data directory, set general.data_dir".to_owned(),
                )
            });
    }

    if let Some(rest) = configured.strip_prefix("~/") {
        let home = dirs::home_dir().ok_or_else(|| {
            CliError::Config(format!(
                "cannot expand '{}': home directory unknown",
                configured
            ))
        })?;
        return Ok(home.join(rest));
    }

    Ok(PathBuf::from(configured))
}

/// Everything a data command needs: datasets and the profile store.
pub struct AppContext {
    pub scanner: AllergenScanner,
    pub store: ProfileStore<JsonFileStorage>,
}

impl AppContext {
    /// Load config, datasets and the stored profile.
    pub async fn open(config_path: &Path) -> Result<Self, CliError> {
        let config = load_config(config_path).await?;

        let scanner =
            AllergenScanner::load(AllergenScannerConfig::from_core(&config.catalog)).await?;

        let data_dir = resolve_data_dir(&config.general)?;
        debug!(data_dir = %data_dir.display(), "opening profile store");
        let storage = JsonFileStorage::new(data_dir, &config.profile.storage_key)?;
        let store = ProfileStore::open(storage).await;

        Ok(Self {
            scanner,
            store,
        })
    }

    /// Reject ids that are not in the allergen catalog.
    pub fn ensure_known_allergens(&self, ids: &[String]) -> Result<(), CliError> {
        let unknown: Vec<&str> = ids
            .iter()
            .map(String::as_str)
            .filter(|id| !self.scanner.catalog().contains(id))
            .collect();
        if unknown.is_empty() {
            return Ok(());
        }
        Err(CliError::Command(format!(
            "unknown allergen id: {} (see `canieat allergens list`)",
            unknown.join(", ")
        )))
    }
}
