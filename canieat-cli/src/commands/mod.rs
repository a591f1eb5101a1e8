//! Command handlers -- one module per subcommand

pub mod allergens;
pub mod config;
pub mod products;
pub mod profile;
pub mod scan;
