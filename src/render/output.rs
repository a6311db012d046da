use base64::Engine as _;

use crate::{
    assets::bitmap::Bitmap,
    foundation::error::IngotResult,
    foundation::math::fingerprint_rgba8,
    surface::mapper::SurfaceArea,
    surface::raster::encode_premul_rgba8,
};

/// Fixed display strings describing how a result was produced.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct RenderMetadata {
    /// Technique name.
    pub technique: &'static str,
    /// Renderer label.
    pub model_label: &'static str,
    /// Ordered stage names.
    pub stage_labels: &'static [&'static str],
}

impl RenderMetadata {
    pub(crate) const TEXT: Self = Self {
        technique: "depth-layered text engraving",
        model_label: "ingot cpu compositor",
        stage_labels: &[
            "letterbox base",
            "engraving depression",
            "depth layers",
            "metallic surface",
        ],
    };

    pub(crate) const LOGO: Self = Self {
        technique: "depth-aware logo compositing",
        model_label: "ingot cpu compositor",
        stage_labels: &[
            "letterbox base",
            "surface integration",
            "logo recolor",
            "depth layers",
            "metallic surface",
        ],
    };

    pub(crate) const BASE_ONLY: Self = Self {
        technique: "base image passthrough",
        model_label: "ingot cpu compositor",
        stage_labels: &["letterbox base"],
    };
}

/// Flattened output of one render.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderResult {
    /// Final pixels, premultiplied RGBA8.
    pub bitmap: Bitmap,
    /// Engraving area the content was placed in (absent for base-only renders).
    pub area: Option<SurfaceArea>,
    /// Display metadata.
    pub metadata: RenderMetadata,
}

impl RenderResult {
    /// Encode as PNG.
    pub fn to_png(&self) -> IngotResult<Vec<u8>> {
        encode_premul_rgba8(
            &self.bitmap.rgba8_premul,
            self.bitmap.width,
            self.bitmap.height,
            image::ImageFormat::Png,
        )
    }

    /// Encode as a `data:image/png;base64,` URL.
    pub fn to_data_url(&self) -> IngotResult<String> {
        let png = self.to_png()?;
        Ok(format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(png)
        ))
    }

    /// Stable digest of the pixels; equal renders have equal fingerprints.
    pub fn fingerprint(&self) -> u64 {
        fingerprint_rgba8(
            self.bitmap.width,
            self.bitmap.height,
            &self.bitmap.rgba8_premul,
        )
    }
}

/// `"{base}-{timestamp_ms}.png"`.
pub fn download_file_name(base: &str, timestamp_ms: u64) -> String {
    format!("{base}-{timestamp_ms}.png")
}

#[cfg(test)]
#[path = "../../tests/unit/render/output.rs"]
mod tests;
