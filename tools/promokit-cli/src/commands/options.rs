//! Inspect or extend the option catalog.

use promokit_campaign_model::catalog::{OptionCatalog, OptionCategory};
use promokit_common::config::AppConfig;

pub fn list(config: &AppConfig, category: Option<OptionCategory>) -> anyhow::Result<()> {
    let catalog = OptionCatalog::load(&config.option_catalog);
    let categories = match category {
        Some(c) => vec![c],
        None => OptionCategory::ALL.to_vec(),
    };

    for category in categories {
        let items = catalog.list(category);
        println!("{category} ({}):", items.len());
        for item in items {
            println!("  - {item}");
        }
    }

    Ok(())
}

pub fn add(config: &AppConfig, category: OptionCategory, item: String) -> anyhow::Result<()> {
    let path = &config.option_catalog;
    let mut catalog = OptionCatalog::load(path);

    if !catalog.add(category, &item) {
        println!("'{}' is blank or already in {category}; nothing to do.", item.trim());
        return Ok(());
    }

    catalog
        .save(path)
        .map_err(|e| anyhow::anyhow!("Failed to save option catalog {}: {e}", path.display()))?;
    tracing::info!(category = %category, item = item.trim(), "Option added");
    println!("Added '{}' to {category}.", item.trim());

    Ok(())
}
