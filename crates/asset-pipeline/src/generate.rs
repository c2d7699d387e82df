//! One-call asset generation: variants, batch, archive.

use std::path::Path;

use promokit_campaign_model::payload::CampaignPayload;
use promokit_campaign_model::variant::{derive_variants, RenderVariant};
use promokit_capture_engine::{CaptureEngine, ChromiumEngine, SettlePolicy};
use promokit_common::config::{AppConfig, DEFAULT_EXPIRY_TEXT};
use promokit_common::error::{AssetError, AssetResult};
use promokit_render_engine::TemplateRenderer;
use serde::{Deserialize, Serialize};

use crate::orchestrator::BatchOrchestrator;
use crate::packager::{package_assets, AssetArchive};

/// Everything one generation run needs from the operator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    /// Selects the background folder and names every output.
    pub campaign_name: String,
    pub payload: CampaignPayload,
}

impl BatchRequest {
    pub fn new(campaign_name: impl Into<String>, payload: CampaignPayload) -> Self {
        Self {
            campaign_name: campaign_name.into(),
            payload,
        }
    }
}

/// Read a campaign payload from a JSON file.
pub fn load_payload(path: &Path) -> AssetResult<CampaignPayload> {
    if !path.is_file() {
        return Err(AssetError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Inputs resolved before any engine is started.
struct Prepared {
    renderer: TemplateRenderer,
    payload: CampaignPayload,
    variants: Vec<RenderVariant>,
}

fn prepare(config: &AppConfig, request: &BatchRequest) -> AssetResult<Prepared> {
    if let Some(dir) = config.templates_dir.as_deref().filter(|d| !d.is_dir()) {
        return Err(AssetError::config(format!(
            "templates_dir {} is not a directory",
            dir.display()
        )));
    }
    let renderer = TemplateRenderer::load(config.templates_dir.as_deref())?;

    let mut payload = request.payload.clone();
    if payload.expiry_text == DEFAULT_EXPIRY_TEXT && config.expiry_text != DEFAULT_EXPIRY_TEXT {
        payload.expiry_text = config.expiry_text.clone();
    }
    payload.validate()?;

    let variants = derive_variants(
        &request.campaign_name,
        payload.discount.kind(),
        &config.base_images_dir,
    )
    .to_vec();

    Ok(Prepared {
        renderer,
        payload,
        variants,
    })
}

/// Run the whole pipeline on an already started engine.
///
/// The engine is shut down before this returns, on every path.
pub async fn generate_with_engine<E: CaptureEngine>(
    mut engine: E,
    config: &AppConfig,
    request: &BatchRequest,
) -> AssetResult<AssetArchive> {
    let prepared = match prepare(config, request) {
        Ok(prepared) => prepared,
        Err(e) => {
            if let Err(close_err) = engine.shutdown().await {
                tracing::warn!(error = %close_err, "Engine shutdown failed");
            }
            return Err(e);
        }
    };
    run_prepared(engine, config, request, prepared).await
}

/// Generate the archive for `request` with a headless Chromium engine.
pub async fn generate_campaign_assets(
    config: &AppConfig,
    request: &BatchRequest,
) -> AssetResult<AssetArchive> {
    tracing::info!(campaign = %request.campaign_name, "Generating campaign assets");
    let prepared = prepare(config, request)?;
    let engine = ChromiumEngine::launch(&config.capture).await?;
    run_prepared(engine, config, request, prepared).await
}

async fn run_prepared<E: CaptureEngine>(
    engine: E,
    config: &AppConfig,
    request: &BatchRequest,
    prepared: Prepared,
) -> AssetResult<AssetArchive> {
    let orchestrator = BatchOrchestrator::new(
        engine,
        prepared.renderer,
        SettlePolicy::from_settings(&config.capture),
        &config.output_dir,
    );
    let report = orchestrator
        .run(&prepared.payload, &prepared.variants)
        .await?;

    let archive = package_assets(&request.campaign_name, &report.outputs)?;
    tracing::info!(
        campaign = %request.campaign_name,
        archive = %archive.file_name,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "Campaign assets ready"
    );
    Ok(archive)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_payload_missing_file() {
        let dir = scratch("promokit_test_load_payload_missing");
        let err = load_payload(&dir.join("nope.json")).unwrap_err();
        assert!(matches!(err, AssetError::FileNotFound { .. }));
        assert_eq!(err.stage(), "io");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_payload_bad_json() {
        let dir = scratch("promokit_test_load_payload_bad");
        let path = dir.join("payload.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_payload(&path), Err(AssetError::Json(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_payload_fixture() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("fixtures")
            .join("sample-campaign")
            .join("payload.json");
        let payload = load_payload(&path).unwrap();
        assert_eq!(payload.coupon_code, "SUPER");
        assert_eq!(payload.courses.len(), 2);
    }

    #[test]
    fn test_missing_templates_dir_is_config_error() {
        let config = AppConfig {
            templates_dir: Some(PathBuf::from("/nonexistent/promokit/templates")),
            ..AppConfig::default()
        };
        let payload = load_payload(
            &PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("../../fixtures/sample-campaign/payload.json"),
        )
        .unwrap();
        let err = prepare(&config, &BatchRequest::new("Super Sale", payload))
            .err()
            .unwrap();
        assert!(matches!(err, AssetError::Config { .. }));
        assert_eq!(err.stage(), "config");
    }
}
