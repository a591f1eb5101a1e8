//! `canieat products` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use canieat_allergen_scanner::{AllergenScanner, UserProfile};
use canieat_core::types::SafetyStatus;

use crate::cli::{ProductsAction, ProductsArgs};
use crate::context::AppContext;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `products` command.
pub async fn execute(
    args: ProductsArgs,
    config_path: &Path,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let ctx = AppContext::open(config_path).await?;
    let profile = ctx.store.current().await;

    match args.action {
        ProductsAction::List => {
            writer.render(&build_product_list(&ctx.scanner, &profile))?;
        }
    }
    Ok(())
}

/// List products in table order with the verdict for `profile`.
pub fn build_product_list(scanner: &AllergenScanner, profile: &UserProfile) -> ProductListReport {
    let products = scanner
        .products()
        .records()
        .iter()
        .map(|product| ProductEntry {
            id: product.id.clone(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            barcode: product.barcode.clone(),
            safety_status: scanner
                .check_product(&product.id, profile)
                .map_or(SafetyStatus::Safe, |analysis| analysis.safety_status),
        })
        .collect();
    ProductListReport { products }
}

#[derive(Serialize)]
pub struct ProductListReport {
    pub products: Vec<ProductEntry>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductEntry {
    pub id: String,
    pub name: String,
    pub brand: String,
    pub barcode: String,
    pub safety_status: SafetyStatus,
}

impl Render for ProductListReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Products: {}", self.products.len())?;
        writeln!(w)?;

        if self.products.is_empty() {
            writeln!(w, "{}", "No products in the product table.".dimmed())?;
            return Ok(());
        }

        writeln!(
            w,
            "{:<15} {:<26} {:<22} Status",
            "Barcode", "Name", "Brand"
        )?;
        writeln!(w, "{}", "-".repeat(78))?;

        for p in &self.products {
            let label = p.safety_status.label();
            let status = match p.safety_status {
                SafetyStatus::Safe => label.green(),
                SafetyStatus::Caution => label.yellow(),
                SafetyStatus::Unsafe => label.red().bold(),
            };
            writeln!(
                w,
                "{:<15} {:<26} {:<22} {}",
                p.barcode, p.name, p.brand, status
            )?;
        }

        Ok(())
    }
}
