//! Rules file commands.
//!
//! # Usage
//!
//! ```bash
//! cc-cli rules check rules.yaml
//! ```

use std::path::Path;

use tracing::info;

use civic_checkout::services::{RulesError, RulesFile};

/// Load and validate a rules file, logging a summary.
///
/// # Errors
///
/// Returns `RulesError` if the file cannot be read, parsed or validated.
pub fn check(path: &Path) -> Result<(), RulesError> {
    info!(path = %path.display(), "Loading rules file");
    let file = RulesFile::from_path(path)?;

    let civic = file.checkout.rules.iter().filter(|r| r.requires_civic_number).count();
    let org = file.checkout.rules.iter().filter(|r| r.requires_org_number).count();
    let free = file.checkout.rules.iter().filter(|r| r.grants_free_shipping).count();

    info!("Rules file is valid");
    info!("  Field profile: {}", file.checkout.field_profile);
    info!("  Enforce required: {}", file.checkout.enforce_required);
    info!(
        "  Rules: {} ({civic} civic, {org} org, {free} free shipping)",
        file.checkout.rules.len()
    );
    info!("  Catalog products: {}", file.catalog.len());

    Ok(())
}
