//! Show the variants a run would produce.

use promokit_campaign_model::payload::DiscountKind;
use promokit_campaign_model::variant::{archive_file_name, derive_variants};
use promokit_common::config::AppConfig;

pub fn run(config: &AppConfig, campaign: String, discount: DiscountKind) -> anyhow::Result<()> {
    let variants = derive_variants(&campaign, discount, &config.base_images_dir);

    println!("Variants for '{campaign}' ({discount:?}):");
    for variant in &variants {
        let marker = if variant.background.is_file() { "OK" } else { "MISSING" };
        println!("  {}", variant.output_name);
        println!(
            "     {} {} expiry={}",
            variant.size, variant.template, variant.use_expiry
        );
        println!("     [{marker}] {}", variant.background.display());
    }
    println!();
    println!("Archive: {}", archive_file_name(&campaign));

    Ok(())
}
