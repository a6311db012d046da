use std::path::Path;

use anyhow::Context as _;

use crate::{
    assets::loader::LoaderOpts,
    foundation::core::PlacementBounds,
    foundation::error::{IngotError, IngotResult},
    render::content::FontSizing,
    surface::mapper::{AreaRatios, MappingMode},
};

/// Compositor settings, loadable from JSON. Every field has a default.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompositorConfig {
    /// Output canvas width in pixels.
    pub width: u32,
    /// Output canvas height in pixels.
    pub height: u32,
    /// Default mapping mode for requests that do not pick one.
    pub mode: MappingMode,
    /// Engraving area placement ratios.
    pub area: AreaRatios,
    /// Ranges user placement adjustments are clamped to.
    pub placement_bounds: PlacementBounds,
    /// Multiplier on depth layer offsets.
    pub depth: f64,
    /// Text longer than this many characters is truncated.
    pub text_max_length: usize,
    /// Font size heuristic.
    pub font_sizing: FontSizing,
    /// Render the letterboxed base alone instead of failing with `NoContent`.
    pub base_only_without_content: bool,
    /// Image loader settings.
    pub loader: LoaderOpts,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            mode: MappingMode::Rect,
            area: AreaRatios::default(),
            placement_bounds: PlacementBounds::default(),
            depth: 1.0,
            text_max_length: 50,
            font_sizing: FontSizing::default(),
            base_only_without_content: false,
            loader: LoaderOpts::default(),
        }
    }
}

impl CompositorConfig {
    /// Check every nested setting.
    pub fn validate(&self) -> IngotResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(IngotError::validation("output size must be > 0"));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(IngotError::validation(format!(
                "output size {}x{} exceeds {}",
                self.width,
                self.height,
                u16::MAX
            )));
        }
        if !self.depth.is_finite() || self.depth < 0.0 {
            return Err(IngotError::validation("depth must be finite and >= 0"));
        }
        if self.text_max_length == 0 {
            return Err(IngotError::validation("text_max_length must be > 0"));
        }
        if self.loader.timeout_ms == 0 {
            return Err(IngotError::validation("loader.timeout_ms must be > 0"));
        }
        if self.loader.cache && self.loader.cache_capacity == 0 {
            return Err(IngotError::validation("loader.cache_capacity must be > 0"));
        }
        self.area.validate()?;
        self.placement_bounds.validate()?;
        self.font_sizing.validate()?;
        Ok(())
    }

    /// Parse and validate a JSON config.
    pub fn from_json_str(s: &str) -> IngotResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| IngotError::validation(format!("invalid config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> IngotResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
