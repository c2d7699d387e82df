//! Batch orchestration: render, capture and composite every variant.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use promokit_campaign_model::payload::CampaignPayload;
use promokit_campaign_model::variant::RenderVariant;
use promokit_capture_engine::{CaptureEngine, SettlePolicy};
use promokit_common::error::AssetResult;
use promokit_render_engine::compositor::composite_files;
use promokit_render_engine::TemplateRenderer;

use crate::snapshot::SnapshotFile;

/// Final rasters produced by a successful batch.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Final raster paths, in variant order.
    pub outputs: Vec<PathBuf>,

    /// Wall time of the variant loop.
    pub elapsed: Duration,
}

/// Runs every variant of one batch through render, capture and composite.
///
/// The orchestrator owns its capture engine for the whole batch and shuts it
/// down exactly once when [`BatchOrchestrator::run`] finishes, whatever the
/// outcome. Variants run strictly one after another; the first failure ends
/// the batch.
pub struct BatchOrchestrator<E: CaptureEngine> {
    engine: E,
    renderer: TemplateRenderer,
    policy: SettlePolicy,
    output_dir: PathBuf,
}

impl<E: CaptureEngine> BatchOrchestrator<E> {
    pub fn new(
        engine: E,
        renderer: TemplateRenderer,
        policy: SettlePolicy,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            engine,
            renderer,
            policy,
            output_dir: output_dir.into(),
        }
    }

    /// Produce every variant, then release the engine.
    pub async fn run(
        mut self,
        payload: &CampaignPayload,
        variants: &[RenderVariant],
    ) -> AssetResult<BatchReport> {
        tracing::info!(
            engine = self.engine.name(),
            variants = variants.len(),
            output_dir = %self.output_dir.display(),
            "Starting asset batch"
        );

        let outcome = self.run_variants(payload, variants).await;
        let shutdown = self.engine.shutdown().await;

        match (outcome, shutdown) {
            (Ok(report), Ok(())) => {
                tracing::info!(
                    outputs = report.outputs.len(),
                    elapsed_ms = report.elapsed.as_millis() as u64,
                    "Asset batch finished"
                );
                Ok(report)
            }
            (Ok(_), Err(e)) => Err(e.into()),
            (Err(e), Ok(())) => {
                tracing::error!(stage = e.stage(), error = %e, "Asset batch failed");
                Err(e)
            }
            (Err(e), Err(close_err)) => {
                tracing::warn!(error = %close_err, "Engine shutdown failed after batch error");
                tracing::error!(stage = e.stage(), error = %e, "Asset batch failed");
                Err(e)
            }
        }
    }

    async fn run_variants(
        &mut self,
        payload: &CampaignPayload,
        variants: &[RenderVariant],
    ) -> AssetResult<BatchReport> {
        let started = Instant::now();
        std::fs::create_dir_all(&self.output_dir)?;

        let mut outputs = Vec::with_capacity(variants.len());
        for variant in variants {
            outputs.push(self.produce(payload, variant).await?);
        }

        Ok(BatchReport {
            outputs,
            elapsed: started.elapsed(),
        })
    }

    async fn produce(
        &mut self,
        payload: &CampaignPayload,
        variant: &RenderVariant,
    ) -> AssetResult<PathBuf> {
        let started = Instant::now();
        tracing::debug!(
            variant = %variant.output_name,
            template = %variant.template,
            "Rendering markup"
        );
        let markup = self
            .renderer
            .render(variant.template, payload, variant.use_expiry)?;

        let snapshot = self
            .engine
            .capture(&markup, variant.size, &self.policy)
            .await?;

        let snapshot_file =
            SnapshotFile::create(self.output_dir.join(variant.snapshot_name()), &snapshot)?;
        let final_path = self.output_dir.join(&variant.output_name);
        let composed = composite_files(
            &variant.background,
            snapshot_file.path(),
            variant.size,
            &final_path,
        );
        drop(snapshot_file);
        composed?;

        tracing::info!(
            variant = %variant.output_name,
            size = %variant.size,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Variant produced"
        );
        Ok(final_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::Path;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::Arc;

    use chrono::NaiveDate;
    use image::{Rgba, RgbaImage};
    use promokit_campaign_model::payload::{CourseEntry, DiscountStructure, ValidityWindow};
    use promokit_campaign_model::variant::{derive_variants, PixelSize};
    use promokit_capture_engine::Snapshot;
    use promokit_common::error::{AssetError, CaptureError, CaptureResult};

    /// Paints a single opaque pixel in the top-left corner.
    struct StubEngine {
        shut_down: Arc<AtomicBool>,
        captures: Arc<AtomicU32>,
        fail_on: Option<u32>,
    }

    #[async_trait::async_trait]
    impl CaptureEngine for StubEngine {
        fn name(&self) -> &str {
            "stub"
        }

        async fn capture(
            &mut self,
            _markup: &str,
            size: PixelSize,
            _policy: &SettlePolicy,
        ) -> CaptureResult<Snapshot> {
            let n = self.captures.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_on == Some(n) {
                return Err(CaptureError::SettleTimeout { timeout_ms: 5 });
            }
            let mut img = RgbaImage::from_pixel(size.width, size.height, Rgba([0, 0, 0, 0]));
            img.put_pixel(0, 0, Rgba([255, 255, 255, 255]));
            let mut png = Vec::new();
            img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
                .unwrap();
            Snapshot::from_png(png, size)
        }

        async fn shutdown(&mut self) -> CaptureResult<()> {
            self.shut_down.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    fn payload() -> CampaignPayload {
        CampaignPayload::new(
            DiscountStructure::flat("50"),
            "SUPER",
            ValidityWindow::new(
                NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            ),
        )
        .with_course(CourseEntry::from_form("JAIIB", "", "PPB", ["Gold"]))
    }

    /// Shrink the variants so tests stay fast.
    fn small_variants(base: &Path) -> Vec<RenderVariant> {
        derive_variants("Test Sale", payload().discount.kind(), base)
            .into_iter()
            .map(|mut v| {
                v.size = PixelSize::new(v.size.width / 40, v.size.height / 40);
                v
            })
            .collect()
    }

    fn setup(name: &str) -> (PathBuf, PathBuf) {
        let root = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&root);
        let base = root.join("base_images");
        let campaign_dir = base.join("Test Sale");
        std::fs::create_dir_all(&campaign_dir).unwrap();
        for file in ["Community_flatdiscount.png", "ytchannelart_flatdiscount.png"] {
            RgbaImage::from_pixel(30, 20, Rgba([0, 80, 160, 255]))
                .save(campaign_dir.join(file))
                .unwrap();
        }
        (root, base)
    }

    fn stub(fail_on: Option<u32>) -> (StubEngine, Arc<AtomicBool>, Arc<AtomicU32>) {
        let shut_down = Arc::new(AtomicBool::new(false));
        let captures = Arc::new(AtomicU32::new(0));
        (
            StubEngine {
                shut_down: shut_down.clone(),
                captures: captures.clone(),
                fail_on,
            },
            shut_down,
            captures,
        )
    }

    fn leftover_snapshots(dir: &Path) -> usize {
        std::fs::read_dir(dir)
            .map(|entries| {
                entries
                    .filter_map(Result::ok)
                    .filter(|e| e.file_name().to_string_lossy().starts_with("temp_"))
                    .count()
            })
            .unwrap_or(0)
    }

    #[tokio::test]
    async fn test_batch_produces_all_variants_and_closes_engine() {
        let (root, base) = setup("promokit_test_orchestrator_ok");
        let out = root.join("output");
        let (engine, shut_down, captures) = stub(None);

        let orchestrator = BatchOrchestrator::new(
            engine,
            TemplateRenderer::builtin().unwrap(),
            SettlePolicy::default(),
            &out,
        );
        let report = orchestrator
            .run(&payload(), &small_variants(&base))
            .await
            .unwrap();

        assert_eq!(report.outputs.len(), 4);
        assert!(report.outputs.iter().all(|p| p.exists()));
        assert_eq!(captures.load(Ordering::SeqCst), 4);
        assert!(shut_down.load(Ordering::SeqCst));
        assert_eq!(leftover_snapshots(&out), 0);

        let first = image::open(&report.outputs[0]).unwrap().to_rgba8();
        assert_eq!(first.dimensions(), (27, 27));
        assert_eq!(*first.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
        assert_eq!(*first.get_pixel(5, 5), Rgba([0, 80, 160, 255]));

        std::fs::remove_dir_all(&root).ok();
    }

    #[tokio::test]
    async fn test_capture_failure_stops_batch_and_still_closes_engine() {
        let (root, base) = setup("promokit_test_orchestrator_capture_fail");
        let out = root.join("output");
        let (engine, shut_down, captures) = stub(Some(2));

        let err = BatchOrchestrator::new(
            engine,
            TemplateRenderer::builtin().unwrap(),
            SettlePolicy::default(),
            &out,
        )
        .run(&payload(), &small_variants(&base))
        .await
        .unwrap_err();

        assert_eq!(err.stage(), "capture");
        assert_eq!(captures.load(Ordering::SeqCst), 2);
        assert!(shut_down.load(Ordering::SeqCst));
        assert_eq!(leftover_snapshots(&out), 0);
        // Only the first variant reached disk.
        assert!(out.join("Test Sale_Comm_Standard.png").exists());
        assert!(!out.join("Test Sale_Comm_Expiry.png").exists());

        std::fs::remove_dir_all(&root).ok();
    }

    #[tokio::test]
    async fn test_missing_background_is_composite_error_and_snapshot_removed() {
        let (root, _base) = setup("promokit_test_orchestrator_missing_bg");
        let out = root.join("output");
        let (engine, shut_down, _) = stub(None);

        let err = BatchOrchestrator::new(
            engine,
            TemplateRenderer::builtin().unwrap(),
            SettlePolicy::default(),
            &out,
        )
        .run(&payload(), &small_variants(&root.join("nowhere")))
        .await
        .unwrap_err();

        assert!(matches!(err, AssetError::Composite(_)));
        assert!(shut_down.load(Ordering::SeqCst));
        assert_eq!(leftover_snapshots(&out), 0);

        std::fs::remove_dir_all(&root).ok();
    }

    #[tokio::test]
    async fn test_render_failure_happens_before_any_capture() {
        let (root, base) = setup("promokit_test_orchestrator_render_fail");
        let (engine, shut_down, captures) = stub(None);
        let mut bad = payload();
        bad.coupon_code = "WAYTOOLONG".into();

        let err = BatchOrchestrator::new(
            engine,
            TemplateRenderer::builtin().unwrap(),
            SettlePolicy::default(),
            root.join("output"),
        )
        .run(&bad, &small_variants(&base))
        .await
        .unwrap_err();

        assert_eq!(err.stage(), "render");
        assert_eq!(captures.load(Ordering::SeqCst), 0);
        assert!(shut_down.load(Ordering::SeqCst));

        std::fs::remove_dir_all(&root).ok();
    }
}
