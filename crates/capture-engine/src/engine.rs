//! Capture engine contract.

use std::path::Path;

use promokit_campaign_model::variant::PixelSize;
use promokit_common::error::{CaptureError, CaptureResult};

use crate::settle::SettlePolicy;

/// A transparent PNG capture of one markup document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Encoded PNG bytes.
    pub png: Vec<u8>,

    /// Pixel dimensions of the encoded image.
    pub size: PixelSize,
}

impl Snapshot {
    /// Wrap PNG bytes, checking they decode to exactly `requested`.
    pub fn from_png(png: Vec<u8>, requested: PixelSize) -> CaptureResult<Self> {
        let decoded = image::load_from_memory_with_format(&png, image::ImageFormat::Png)
            .map_err(|e| {
                CaptureError::snapshot(format!("engine returned an unreadable PNG: {e}"))
            })?;

        let actual = PixelSize::new(decoded.width(), decoded.height());
        if actual != requested {
            return Err(CaptureError::Surface {
                width: requested.width,
                height: requested.height,
                message: format!("surface painted {actual} instead"),
            });
        }

        Ok(Self {
            png,
            size: requested,
        })
    }

    /// Write the PNG bytes to `path`.
    pub fn write_to(&self, path: &Path) -> CaptureResult<()> {
        std::fs::write(path, &self.png).map_err(|e| {
            CaptureError::snapshot(format!("cannot write snapshot {}: {e}", path.display()))
        })
    }
}

/// Something that can paint markup into a transparent raster.
///
/// An engine is owned by exactly one batch. `capture` takes `&mut self`, so a
/// caller can never hold two capture surfaces at once; implementations open a
/// fresh surface per call and close it before returning.
#[async_trait::async_trait]
pub trait CaptureEngine: Send {
    /// Engine name for logs.
    fn name(&self) -> &str;

    /// Paint `markup` on a `size` surface and snapshot it with a transparent
    /// background once `policy` reports the document settled.
    async fn capture(
        &mut self,
        markup: &str,
        size: PixelSize,
        policy: &SettlePolicy,
    ) -> CaptureResult<Snapshot>;

    /// Release the engine's process. Called once, after the last capture,
    /// on success and failure paths alike.
    async fn shutdown(&mut self) -> CaptureResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_of(width: u32, height: u32) -> Vec<u8> {
        let mut bytes = Vec::new();
        RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]))
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_snapshot_accepts_exact_size() {
        let snapshot = Snapshot::from_png(png_of(1080, 1080), PixelSize::new(1080, 1080)).unwrap();
        assert_eq!(snapshot.size, PixelSize::new(1080, 1080));
    }

    #[test]
    fn test_snapshot_rejects_wrong_size() {
        let err = Snapshot::from_png(png_of(800, 600), PixelSize::new(1600, 900)).unwrap_err();
        match err {
            CaptureError::Surface { width, height, .. } => {
                assert_eq!((width, height), (1600, 900));
            }
            other => panic!("expected Surface error, got {other:?}"),
        }
    }

    #[test]
    fn test_snapshot_rejects_garbage() {
        let err = Snapshot::from_png(b"nope".to_vec(), PixelSize::new(1, 1)).unwrap_err();
        assert!(matches!(err, CaptureError::Snapshot { .. }));
    }
}
