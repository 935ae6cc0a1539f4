//! Pricing configuration loading.
//!
//! Without a file the published default rates apply. A TOML file may
//! override any subset of [`PricingConfig`]; omitted keys keep their
//! defaults, and the merged result is validated before use.
//!
//! ```toml
//! fallback_rate = 60
//! floor = 80
//!
//! [material_rates]
//! acier = 48
//! inox = 92
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use devis_core::PricingConfig;

/// Loads the pricing table, optionally overridden from `path`.
pub fn load_pricing(path: Option<&Path>) -> Result<PricingConfig> {
    let config = match path {
        None => PricingConfig::default(),
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("cannot read pricing file '{}'", path.display()))?;
            toml::from_str(&text)
                .with_context(|| format!("invalid pricing file '{}'", path.display()))?
        }
    };
    config
        .validate()
        .context("pricing configuration is invalid")?;
    Ok(config)
}
