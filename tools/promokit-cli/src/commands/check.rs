//! Check browser, background and template availability.

use std::path::Path;

use promokit_campaign_model::catalog::{OptionCatalog, OptionCategory};
use promokit_campaign_model::variant::TemplateId;
use promokit_capture_engine::backend::detect_browser;
use promokit_common::config::AppConfig;
use promokit_render_engine::TemplateRenderer;

/// What `check` found (or did) at the effective config path.
#[derive(Debug, PartialEq, Eq)]
enum ConfigStatus {
    Present,
    Written,
    Defaults,
}

fn ensure_config(
    config: &AppConfig,
    config_path: &Path,
    init_config: bool,
) -> anyhow::Result<ConfigStatus> {
    if config_path.exists() {
        return Ok(ConfigStatus::Present);
    }
    if !init_config {
        return Ok(ConfigStatus::Defaults);
    }
    config.save_to(config_path).map_err(|e| {
        anyhow::anyhow!("Failed to write config {}: {e}", config_path.display())
    })?;
    tracing::info!(path = %config_path.display(), "Default config written");
    Ok(ConfigStatus::Written)
}

pub fn run(config: &AppConfig, config_path: &Path, init_config: bool) -> anyhow::Result<()> {
    println!("PromoKit System Check");
    println!("{}", "=".repeat(50));

    match ensure_config(config, config_path, init_config)? {
        ConfigStatus::Present => println!("[OK] Config: {}", config_path.display()),
        ConfigStatus::Written => println!("[OK] Config written: {}", config_path.display()),
        ConfigStatus::Defaults => {
            println!("[INFO] Config: defaults (no {})", config_path.display())
        }
    }

    let mut ready = true;

    // Browser
    match detect_browser(&config.capture) {
        Some(path) => println!("[OK] Browser: {}", path.display()),
        None => {
            ready = false;
            println!("[FAIL] Browser: no Chromium/Chrome found");
            println!("     Install chromium or set capture.browser_executable / CHROME");
        }
    }

    // Templates
    match TemplateRenderer::load(config.templates_dir.as_deref()) {
        Ok(_) => {
            let source = config
                .templates_dir
                .as_ref()
                .map(|d| d.display().to_string())
                .unwrap_or_else(|| "built-in".to_string());
            println!("[OK] Templates ({source}):");
            for template in TemplateId::ALL {
                println!("     {template}");
            }
        }
        Err(e) => {
            ready = false;
            println!("[FAIL] Templates: {e}");
        }
    }

    // Backgrounds
    let base = &config.base_images_dir;
    if base.is_dir() {
        println!("[OK] Backgrounds: {}", base.display());
        let catalog = OptionCatalog::load(&config.option_catalog);
        for campaign in catalog.list(OptionCategory::Campaigns) {
            let marker = if base.join(campaign).is_dir() { "OK" } else { "WARN" };
            println!("     [{marker}] {campaign}");
        }
    } else {
        ready = false;
        println!("[FAIL] Backgrounds: {} not found", base.display());
    }

    println!();
    if ready {
        println!("PromoKit is ready.");
    } else {
        println!("Some requirements are missing. See above for fixes.");
    }

    Ok(())
}
