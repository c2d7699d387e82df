//! Run the full asset pipeline and write the archive.

use std::path::PathBuf;

use promokit_asset_pipeline::{generate_campaign_assets, load_payload, BatchRequest};
use promokit_common::config::AppConfig;

pub async fn run(
    config: &AppConfig,
    payload_path: PathBuf,
    campaign: String,
    out: PathBuf,
) -> anyhow::Result<()> {
    let payload = load_payload(&payload_path)
        .map_err(|e| anyhow::anyhow!("Failed to load payload {}: {e}", payload_path.display()))?;

    println!("Generating assets for '{campaign}'");
    println!("  Discount: {}", payload.discount.label());
    println!("  Coupon: {}", payload.coupon_code);
    println!("  Validity: {}", payload.validity_text());
    println!("  Courses: {}", payload.courses.len());

    let request = BatchRequest::new(campaign, payload);
    let archive = generate_campaign_assets(config, &request)
        .await
        .map_err(|e| anyhow::anyhow!("Generation failed ({} stage): {e}", e.stage()))?;

    let path = archive
        .write_to_dir(&out)
        .map_err(|e| anyhow::anyhow!("Failed to write archive into {}: {e}", out.display()))?;

    println!();
    println!("Archive written: {}", path.display());
    println!("  Size: {} bytes", archive.bytes.len());

    Ok(())
}
