use crate::{
    assets::loader::ImageRef,
    foundation::core::PlacementSettings,
    foundation::error::{IngotError, IngotResult},
    surface::mapper::MappingMode,
};

/// One user-triggered render.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EngravingRequest {
    /// Product surface image.
    pub base_image: ImageRef,
    /// Text to engrave. Takes precedence over `logo` when both are set.
    #[serde(default)]
    pub text: Option<String>,
    /// Logo to engrave.
    #[serde(default)]
    pub logo: Option<ImageRef>,
    /// Placement adjustments.
    #[serde(default)]
    pub placement: PlacementSettings,
    /// Rect or perspective placement; `None` uses the compositor's configured mode.
    #[serde(default)]
    pub mode: Option<MappingMode>,
}

/// The rendering path a request resolves to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Content<'a> {
    /// Engrave text (already truncated to the configured maximum length).
    Text {
        /// Trimmed, truncated text.
        value: &'a str,
        /// Limit that was applied.
        max_length: usize,
    },
    /// Engrave a logo.
    Logo {
        /// Logo reference.
        image_ref: &'a ImageRef,
    },
}

impl EngravingRequest {
    /// Request with only a base image and default placement.
    pub fn new(base_image: ImageRef) -> Self {
        Self {
            base_image,
            text: None,
            logo: None,
            placement: PlacementSettings::default(),
            mode: None,
        }
    }

    /// Set the text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the logo content.
    pub fn with_logo(mut self, logo: ImageRef) -> Self {
        self.logo = Some(logo);
        self
    }

    /// Replace the placement.
    pub fn with_placement(mut self, placement: PlacementSettings) -> Self {
        self.placement = placement;
        self
    }

    /// Pick the mapping mode instead of the compositor's default.
    pub fn with_mode(mut self, mode: MappingMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Mapping mode to render with, given the configured default.
    pub fn mode_or(&self, default: MappingMode) -> MappingMode {
        self.mode.unwrap_or(default)
    }

    /// Pick the rendering path.
    ///
    /// Text wins whenever it is set, even if blank: blank text is `EmptyText`, not a fallback to
    /// the logo. Neither set is `NoContent`.
    pub fn content(&self, max_length: usize) -> IngotResult<Content<'_>> {
        if let Some(text) = &self.text {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Err(IngotError::EmptyText);
            }
            return Ok(Content::Text {
                value: crate::render::content::truncate_chars(trimmed, max_length),
                max_length,
            });
        }
        match &self.logo {
            Some(image_ref) => Ok(Content::Logo { image_ref }),
            None => Err(IngotError::NoContent),
        }
    }

    /// Logo reference that actually needs loading (none when text takes precedence).
    pub fn logo_to_load(&self) -> Option<&ImageRef> {
        if self.text.is_some() {
            None
        } else {
            self.logo.as_ref()
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/request.rs"]
mod tests;
