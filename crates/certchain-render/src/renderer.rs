use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use certchain_types::CertificateRecord;
use chrono::{Local, NaiveDateTime};
use image::GenericImageView;
use serde::Serialize;

use crate::config::RenderConfig;
use crate::error::{RenderError, RenderResult};
use crate::layout::{self, RenderAssets};
use crate::pdf::RasterImage;

/// Images larger than this (on either side) are downscaled before embedding.
const MAX_ASSET_SIDE: u32 = 400;

/// Upper bound on `_n` suffixes tried when the timestamped name is taken.
const MAX_NAME_SUFFIX: u32 = 1000;

/// A certificate written to disk.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenderedCertificate {
    pub path: PathBuf,
    pub verification_url: String,
}

/// Renders certificates to PDF files under the configured output directory.
pub struct CertificateRenderer {
    config: RenderConfig,
}

impl CertificateRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn verification_url(&self, record: &CertificateRecord) -> String {
        layout::verification_url(&self.config.verification_base_url, &record.cert_id)
    }

    /// Render `record` and write it as `<CERT_ID>_<YYYYmmddHHMMSS>.pdf`.
    ///
    /// Existing files are never overwritten: a clashing name gets a `_<n>`
    /// suffix.
    pub fn render(&self, record: &CertificateRecord) -> RenderResult<RenderedCertificate> {
        self.render_at(record, Local::now().naive_local())
    }

    pub fn render_at(
        &self,
        record: &CertificateRecord,
        generated_at: NaiveDateTime,
    ) -> RenderResult<RenderedCertificate> {
        let verification_url = self.verification_url(record);
        let assets = self.load_assets();
        let pdf = layout::render_pdf(record, &assets, &verification_url)?;

        fs::create_dir_all(&self.config.output_dir)?;
        let stem = format!(
            "{}_{}",
            file_safe(record.cert_id.as_str()),
            generated_at.format("%Y%m%d%H%M%S")
        );
        let path = write_new_file(&self.config.output_dir, &stem, &pdf)?;

        tracing::info!(cert_id = %record.cert_id, path = %path.display(), "certificate rendered");
        Ok(RenderedCertificate {
            path,
            verification_url,
        })
    }

    /// Load the configured logo and signature, skipping any that are missing.
    pub fn load_assets(&self) -> RenderAssets {
        RenderAssets {
            logo: self.config.logo_path.as_deref().and_then(|p| load_asset("logo", p)),
            signature: self
                .config
                .signature_path
                .as_deref()
                .and_then(|p| load_asset("signature", p)),
        }
    }
}

fn load_asset(kind: &str, path: &Path) -> Option<RasterImage> {
    match load_raster(path) {
        Ok(image) => Some(image),
        Err(e) => {
            tracing::warn!(asset = kind, path = %path.display(), error = %e, "asset unavailable, skipping");
            None
        }
    }
}

/// Decode an image file and flatten any transparency onto white.
pub fn load_raster(path: &Path) -> Result<RasterImage, image::ImageError> {
    let mut decoded = image::open(path)?;
    let (w, h) = decoded.dimensions();
    if w > MAX_ASSET_SIDE || h > MAX_ASSET_SIDE {
        decoded = decoded.thumbnail(MAX_ASSET_SIDE, MAX_ASSET_SIDE);
    }
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgb = Vec::with_capacity((width * height * 3) as usize);
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        for channel in [r, g, b] {
            let blended = (channel as u32 * a as u32 + 255 * (255 - a as u32)) / 255;
            rgb.push(blended as u8);
        }
    }

    Ok(RasterImage { width, height, rgb })
}

fn file_safe(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

fn write_new_file(dir: &Path, stem: &str, data: &[u8]) -> RenderResult<PathBuf> {
    for n in 0..MAX_NAME_SUFFIX {
        let name = if n == 0 {
            format!("{stem}.pdf")
        } else {
            format!("{stem}_{n}.pdf")
        };
        let path = dir.join(name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(data)?;
                return Ok(path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Err(RenderError::NoFreeFileName(stem.to_string()))
}
