//! Background compositor: layers a transparent snapshot over a campaign
//! background.
//!
//! The background is decoded, converted to RGBA, resized to the variant's
//! exact target size, and the snapshot is blended on top with the standard
//! source-over operator.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use promokit_campaign_model::variant::PixelSize;
use promokit_common::error::{CompositeError, CompositeResult};

/// Resampling filter used when fitting backgrounds to the target size.
pub const BACKGROUND_FILTER: FilterType = FilterType::Lanczos3;

/// Decode `path` and fit it to `size`.
pub fn load_background(path: &Path, size: PixelSize) -> CompositeResult<RgbaImage> {
    if !path.is_file() {
        return Err(CompositeError::BackgroundMissing {
            path: path.to_path_buf(),
        });
    }

    let decoded = image::open(path).map_err(|e| CompositeError::BackgroundDecode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let rgba = to_rgba(decoded)?;

    if rgba.dimensions() == size.as_tuple() {
        return Ok(rgba);
    }

    tracing::debug!(
        path = %path.display(),
        from_width = rgba.width(),
        from_height = rgba.height(),
        to = %size,
        "Resizing background"
    );
    Ok(imageops::resize(&rgba, size.width, size.height, BACKGROUND_FILTER))
}

/// Decode a captured snapshot file.
pub fn load_snapshot(path: &Path) -> CompositeResult<RgbaImage> {
    let decoded = image::open(path).map_err(|e| CompositeError::SnapshotDecode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    to_rgba(decoded)
}

/// Convert any supported pixel layout to 8-bit RGBA.
pub fn to_rgba(image: DynamicImage) -> CompositeResult<RgbaImage> {
    match image {
        DynamicImage::ImageRgba8(rgba) => Ok(rgba),
        DynamicImage::ImageLuma8(_)
        | DynamicImage::ImageLumaA8(_)
        | DynamicImage::ImageRgb8(_)
        | DynamicImage::ImageLuma16(_)
        | DynamicImage::ImageLumaA16(_)
        | DynamicImage::ImageRgb16(_)
        | DynamicImage::ImageRgba16(_)
        | DynamicImage::ImageRgb32F(_)
        | DynamicImage::ImageRgba32F(_) => Ok(image.to_rgba8()),
        other => Err(CompositeError::ColorModel {
            message: format!("unsupported color type {:?}", other.color()),
        }),
    }
}

/// Source-over composite of `foreground` onto `background`.
///
/// Both images must have the same dimensions.
pub fn alpha_composite(
    background: &RgbaImage,
    foreground: &RgbaImage,
) -> CompositeResult<RgbaImage> {
    if background.dimensions() != foreground.dimensions() {
        return Err(CompositeError::SizeMismatch {
            expected: background.dimensions(),
            actual: foreground.dimensions(),
        });
    }

    let mut out = background.clone();
    for (dst, src) in out.pixels_mut().zip(foreground.pixels()) {
        *dst = blend_over(*dst, *src);
    }
    Ok(out)
}

fn blend_over(bg: Rgba<u8>, fg: Rgba<u8>) -> Rgba<u8> {
    match fg.0[3] {
        0 => bg,
        255 => fg,
        alpha => {
            let fa = alpha as f32 / 255.0;
            let ba = bg.0[3] as f32 / 255.0;
            let out_a = fa + ba * (1.0 - fa);

            let mut px = [0u8; 4];
            for c in 0..3 {
                let value = (fg.0[c] as f32 * fa + bg.0[c] as f32 * ba * (1.0 - fa)) / out_a;
                px[c] = value.round().clamp(0.0, 255.0) as u8;
            }
            px[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
            Rgba(px)
        }
    }
}

/// Composite a decoded foreground over the background at `background_path`.
pub fn composite_over_background(
    background_path: &Path,
    size: PixelSize,
    foreground: &RgbaImage,
) -> CompositeResult<RgbaImage> {
    if foreground.dimensions() != size.as_tuple() {
        return Err(CompositeError::SizeMismatch {
            expected: size.as_tuple(),
            actual: foreground.dimensions(),
        });
    }
    let background = load_background(background_path, size)?;
    alpha_composite(&background, foreground)
}

/// Composite the snapshot file over the background and write a PNG.
pub fn composite_files(
    background_path: &Path,
    snapshot_path: &Path,
    size: PixelSize,
    output_path: &Path,
) -> CompositeResult<()> {
    let foreground = load_snapshot(snapshot_path)?;
    let composed = composite_over_background(background_path, size, &foreground)?;
    composed
        .save_with_format(output_path, ImageFormat::Png)
        .map_err(|e| CompositeError::Write {
            path: output_path.to_path_buf(),
            message: e.to_string(),
        })?;
    tracing::debug!(output = %output_path.display(), size = %size, "Composite written");
    Ok(())
}
