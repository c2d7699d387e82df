//! Settle policy: when is a document painted enough to capture?
//!
//! Text and layout may paint asynchronously after the markup is loaded, so a
//! capture waits for a readiness probe to pass (bounded by a hard timeout)
//! and then for a fixed settle delay.

use std::future::Future;
use std::time::{Duration, Instant};

use promokit_common::config::CaptureSettings;
use promokit_common::error::{CaptureError, CaptureResult};

/// Script evaluated in the page; true once layout, fonts and images are done.
pub const READINESS_SCRIPT: &str = r#"(() => {
    if (document.readyState !== "complete") return false;
    if (document.fonts && document.fonts.status !== "loaded") return false;
    return Array.from(document.images).every((img) => img.complete);
})()"#;

/// Readiness wait parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettlePolicy {
    /// Upper bound on the readiness wait; exceeding it fails the capture.
    pub ready_timeout: Duration,

    /// Delay between readiness probes.
    pub poll_interval: Duration,

    /// Fixed delay applied after the probe passes.
    pub settle_delay: Duration,
}

impl Default for SettlePolicy {
    fn default() -> Self {
        Self::from_settings(&CaptureSettings::default())
    }
}

impl SettlePolicy {
    pub fn from_settings(settings: &CaptureSettings) -> Self {
        Self {
            ready_timeout: settings.ready_timeout(),
            poll_interval: settings.poll_interval(),
            settle_delay: settings.settle_delay(),
        }
    }

    /// Poll `probe` until it returns `true`, then sleep the settle delay.
    ///
    /// Returns the time spent waiting for readiness. A probe error aborts the
    /// wait immediately.
    pub async fn wait<F, Fut>(&self, mut probe: F) -> CaptureResult<Duration>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = CaptureResult<bool>>,
    {
        let started = Instant::now();
        let poll_interval = self.poll_interval.max(Duration::from_millis(1));

        let ready = tokio::time::timeout(self.ready_timeout, async {
            let mut probes = 0u32;
            loop {
                probes += 1;
                if probe().await? {
                    tracing::debug!(probes, "Document ready");
                    return Ok::<(), CaptureError>(());
                }
                tokio::time::sleep(poll_interval).await;
            }
        })
        .await;

        match ready {
            Ok(result) => result?,
            Err(_) => {
                return Err(CaptureError::SettleTimeout {
                    timeout_ms: self.ready_timeout.as_millis() as u64,
                })
            }
        }

        let waited = started.elapsed();
        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }
        Ok(waited)
    }
}
