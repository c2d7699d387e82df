//! Archive packaging of finished rasters.

use std::fs::File;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use promokit_campaign_model::variant::archive_file_name;
use promokit_common::error::{PackagingError, PackagingResult};

/// A finished campaign archive held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetArchive {
    /// Suggested download name, e.g. `Super_Sale_Assets.zip`.
    pub file_name: String,

    /// Encoded zip bytes.
    pub bytes: Vec<u8>,
}

impl AssetArchive {
    /// Write the archive into `dir` under its suggested name.
    pub fn write_to_dir(&self, dir: &Path) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        let mut file = File::create(&path)?;
        file.write_all(&self.bytes)?;
        file.sync_all()?;
        Ok(path)
    }
}

/// Bundle `rasters` into one deflated zip and delete each source once copied.
///
/// Entries use the bare file name of their source. A missing source fails the
/// whole archive; sources copied before the failure are already gone.
pub fn package_assets(campaign_name: &str, rasters: &[PathBuf]) -> PackagingResult<AssetArchive> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    for raster in rasters {
        if !raster.is_file() {
            return Err(PackagingError::MissingRaster {
                path: raster.clone(),
            });
        }
        let entry = raster
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                PackagingError::archive(format!("{} has no file name", raster.display()))
            })?;

        zip.start_file(entry.as_str(), options)
            .map_err(|e| PackagingError::archive(e.to_string()))?;
        let mut source = File::open(raster).map_err(|_| PackagingError::MissingRaster {
            path: raster.clone(),
        })?;
        std::io::copy(&mut source, &mut zip)
            .map_err(|e| PackagingError::archive(format!("{entry}: {e}")))?;
        drop(source);

        std::fs::remove_file(raster).map_err(|e| PackagingError::Cleanup {
            path: raster.clone(),
            message: e.to_string(),
        })?;
        tracing::debug!(entry = %entry, "Raster archived");
    }

    let bytes = zip
        .finish()
        .map_err(|e| PackagingError::archive(e.to_string()))?
        .into_inner();

    let archive = AssetArchive {
        file_name: archive_file_name(campaign_name),
        bytes,
    };
    tracing::info!(
        archive = %archive.file_name,
        entries = rasters.len(),
        bytes = archive.bytes.len(),
        "Archive packaged"
    );
    Ok(archive)
}
