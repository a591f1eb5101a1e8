//! CLI-specific error types and exit code mapping

use canieat_allergen_scanner::AllergenScannerError;
use canieat_core::error::CanIEatError;

/// CLI-specific error type.
///
/// Each variant carries enough context for a user-friendly message.
/// The `exit_code()` method maps errors to standard Unix exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// The scanned barcode is not in the product table.
    #[error("product not found: {0}")]
    NotFound(String),

    /// The scanned product contains allergens from the profile.
    #[error("not safe: contains {0}")]
    Unsafe(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapped domain error from canieat-core.
    #[error("{0}")]
    Core(#[from] CanIEatError),

    /// Allergen scanner domain error (datasets, profile storage).
    #[error("scanner error: {0}")]
    Scanner(String),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                |
    /// |------|----------------------------------------|
    /// | 0    | Success (scan verdict safe or caution) |
    /// | 1    | General / command error                |
    /// | 2    | Configuration error                    |
    /// | 3    | Scanned barcode not found              |
    /// | 4    | Scanned product is not safe            |
    /// | 10   | IO error                               |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Core(CanIEatError::Config(_)) => 2,
            Self::NotFound(_) => 3,
            Self::Unsafe(_) => 4,
            Self::Io(_) | Self::Core(CanIEatError::Io(_)) => 10,
            Self::JsonSerialize(_) | Self::Command(_) | Self::Core(_) | Self::Scanner(_) => 1,
        }
    }

    /// A scan verdict that has already been rendered, not a failure to report.
    pub fn is_verdict(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Unsafe(_))
    }
}

impl From<AllergenScannerError> for CliError {
    fn from(e: AllergenScannerError) -> Self {
        match e {
            AllergenScannerError::Config { .. } => Self::Config(e.to_string()),
            _ => Self::Scanner(e.to_string()),
        }
    }
}
