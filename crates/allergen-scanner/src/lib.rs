#![doc = include_str!("../README.md")]
//!
//! # Module Structure
//!
//! - [`error`]: Domain error types (`AllergenScannerError`)
//! - [`config`]: Scanner configuration (`AllergenScannerConfig`, builder)
//! - [`types`]: Domain types (`ProductRecord`, `UserProfile`, `ProfileUpdate`, `SymptomGuide`)
//! - [`catalog`]: Allergen catalog (`AllergenCatalog`)
//! - [`products`]: Product table and barcode lookup (`ProductTable`, `find_by_barcode`)
//! - [`symptoms`]: Symptom guides (`SymptomCatalog`)
//! - [`analyzer`]: Safety analyzer (`analyze`, `AnalysisResult`)
//! - [`profile`]: Profile store (`ProfileStore`, `ProfileStorage` trait, `JsonFileStorage`, `MemoryStorage`)
//! - [`scanner`]: Main orchestrator (`AllergenScanner`, `AllergenScannerBuilder`, `ScanOutcome`)
//!
//! # Architecture
//!
//! ```text
//! barcode --> ProductTable --> ProductRecord --+
//!                                              |
//!            ProfileStore --> UserProfile -----+--> analyze --> AnalysisResult
//!                                              |                     |
//!            AllergenCatalog --> records() ----+               ScanOutcome
//! ```

pub mod analyzer;
pub mod catalog;
pub mod config;
mod dataset;
pub mod error;
pub mod products;
pub mod profile;
pub mod scanner;
pub mod symptoms;
pub mod types;

// --- Public API Re-exports ---

// Scanner (main orchestrator)
pub use scanner::{AllergenScanner, AllergenScannerBuilder, ScanOutcome};

// Configuration
pub use config::{AllergenScannerConfig, AllergenScannerConfigBuilder};

// Error
pub use error::AllergenScannerError;

// Types
pub use types::{ProductRecord, ProfileUpdate, SymptomGuide, UserProfile};

// Datasets
pub use catalog::AllergenCatalog;
pub use dataset::{ALLERGENS_FILE, PRODUCTS_FILE, SYMPTOMS_FILE};
pub use products::{ProductTable, find_by_barcode};
pub use symptoms::SymptomCatalog;

// Analyzer
pub use analyzer::{AnalysisResult, analyze};

// Profile
pub use profile::{JsonFileStorage, MemoryStorage, ProfileStorage, ProfileStore};
