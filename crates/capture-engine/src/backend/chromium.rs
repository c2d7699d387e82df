use std::time::Instant;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, Viewport};
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use tokio::task::JoinHandle;

use promokit_campaign_model::variant::PixelSize;
use promokit_common::config::CaptureSettings;
use promokit_common::error::{CaptureError, CaptureResult};

use crate::engine::{CaptureEngine, Snapshot};
use crate::settle::{SettlePolicy, READINESS_SCRIPT};

/// Headless Chromium driven over the DevTools protocol.
///
/// One browser process lives for the whole batch. Every capture opens a new
/// page, overrides its metrics to the exact target size, and closes it again.
pub struct ChromiumEngine {
    browser: Browser,
    handler: Option<JoinHandle<()>>,
    closed: bool,
    captures: u32,
}

impl ChromiumEngine {
    /// Launch a headless browser according to `settings`.
    pub async fn launch(settings: &CaptureSettings) -> CaptureResult<Self> {
        let mut builder = BrowserConfig::builder().launch_timeout(settings.launch_timeout());
        if !settings.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(executable) = &settings.browser_executable {
            builder = builder.chrome_executable(executable);
        }
        let config = builder.build().map_err(CaptureError::engine_start)?;

        let started = Instant::now();
        let (browser, mut events) = Browser::launch(config)
            .await
            .map_err(|e| CaptureError::engine_start(e.to_string()))?;

        // The CDP connection only makes progress while its event stream is
        // polled.
        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if let Err(e) = event {
                    tracing::debug!(error = %e, "Browser event handler error");
                }
            }
            tracing::debug!("Browser event handler finished");
        });

        tracing::info!(
            launch_ms = started.elapsed().as_millis() as u64,
            executable = ?settings.browser_executable,
            "Headless browser started"
        );

        Ok(Self {
            browser,
            handler: Some(handler),
            closed: false,
            captures: 0,
        })
    }

    async fn paint(
        page: &Page,
        markup: &str,
        size: PixelSize,
        policy: &SettlePolicy,
    ) -> CaptureResult<Snapshot> {
        page.execute(SetDeviceMetricsOverrideParams::new(
            size.width as i64,
            size.height as i64,
            1.0,
            false,
        ))
        .await
        .map_err(|e| CaptureError::Surface {
            width: size.width,
            height: size.height,
            message: e.to_string(),
        })?;

        page.set_content(markup)
            .await
            .map_err(|e| CaptureError::snapshot(format!("failed to load markup: {e}")))?;

        let waited = policy
            .wait(|| async move {
                page.evaluate(READINESS_SCRIPT)
                    .await
                    .map_err(|e| CaptureError::snapshot(format!("readiness probe failed: {e}")))?
                    .into_value::<bool>()
                    .map_err(|e| CaptureError::snapshot(format!("readiness probe result: {e}")))
            })
            .await?;
        tracing::debug!(waited_ms = waited.as_millis() as u64, "Document settled");

        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .omit_background(true)
            .clip(Viewport {
                x: 0.0,
                y: 0.0,
                width: size.width as f64,
                height: size.height as f64,
                scale: 1.0,
            })
            .build();
        let png = page
            .screenshot(params)
            .await
            .map_err(|e| CaptureError::snapshot(e.to_string()))?;

        Snapshot::from_png(png, size)
    }
}

#[async_trait::async_trait]
impl CaptureEngine for ChromiumEngine {
    fn name(&self) -> &str {
        "chromium"
    }

    async fn capture(
        &mut self,
        markup: &str,
        size: PixelSize,
        policy: &SettlePolicy,
    ) -> CaptureResult<Snapshot> {
        if self.closed {
            return Err(CaptureError::engine_start("browser already shut down"));
        }

        let started = Instant::now();
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| CaptureError::Surface {
                width: size.width,
                height: size.height,
                message: e.to_string(),
            })?;

        let result = Self::paint(&page, markup, size, policy).await;

        // The surface is closed whether or not painting worked.
        if let Err(e) = page.close().await {
            tracing::warn!(error = %e, "Failed to close capture page");
        }

        self.captures += 1;
        if result.is_ok() {
            tracing::debug!(
                size = %size,
                elapsed_ms = started.elapsed().as_millis() as u64,
                capture = self.captures,
                "Captured surface"
            );
        }
        result
    }

    async fn shutdown(&mut self) -> CaptureResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;

        let close_result = self.browser.close().await;
        let wait_result = self.browser.wait().await;
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }

        close_result.map_err(|e| CaptureError::Shutdown {
            message: e.to_string(),
        })?;
        wait_result.map_err(|e| CaptureError::Shutdown {
            message: e.to_string(),
        })?;

        tracing::info!(captures = self.captures, "Headless browser closed");
        Ok(())
    }
}

impl Drop for ChromiumEngine {
    fn drop(&mut self) {
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
        if !self.closed {
            tracing::warn!("Headless browser dropped without shutdown");
        }
    }
}
