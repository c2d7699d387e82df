//! Real-browser capture checks. Need a Chromium/Chrome binary:
//! `cargo test -p promokit-capture-engine -- --ignored`.

use std::time::Duration;

use promokit_campaign_model::variant::PixelSize;
use promokit_capture_engine::{CaptureEngine, ChromiumEngine, SettlePolicy};
use promokit_common::config::CaptureSettings;

const OVERSIZED_MARKUP: &str = r#"<!DOCTYPE html>
<html><body style="margin:0;background:transparent">
  <div style="width:4000px;height:3000px;font-size:120px;color:#fff">
    FLAT 50% OFF
  </div>
</body></html>"#;

fn quick_policy() -> SettlePolicy {
    SettlePolicy {
        ready_timeout: Duration::from_secs(10),
        poll_interval: Duration::from_millis(25),
        settle_delay: Duration::from_millis(100),
    }
}

#[tokio::test]
#[ignore = "requires a local Chromium installation"]
async fn capture_matches_requested_size_regardless_of_content() {
    let mut engine = ChromiumEngine::launch(&CaptureSettings::default())
        .await
        .expect("browser should launch");

    let square = engine
        .capture(OVERSIZED_MARKUP, PixelSize::new(1080, 1080), &quick_policy())
        .await;
    let wide = engine
        .capture(OVERSIZED_MARKUP, PixelSize::new(1600, 900), &quick_policy())
        .await;
    engine.shutdown().await.expect("browser should close");

    assert_eq!(square.unwrap().size, PixelSize::new(1080, 1080));
    assert_eq!(wide.unwrap().size, PixelSize::new(1600, 900));
}

#[tokio::test]
#[ignore = "requires a local Chromium installation"]
async fn empty_document_captures_fully_transparent() {
    let mut engine = ChromiumEngine::launch(&CaptureSettings::default())
        .await
        .expect("browser should launch");

    let snapshot = engine
        .capture(
            "<html><body style=\"margin:0\"></body></html>",
            PixelSize::new(64, 64),
            &quick_policy(),
        )
        .await;
    engine.shutdown().await.expect("browser should close");

    let image = image::load_from_memory(&snapshot.unwrap().png)
        .unwrap()
        .to_rgba8();
    assert!(image.pixels().all(|p| p.0[3] == 0));
}
