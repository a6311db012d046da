use std::sync::Arc;

use crate::foundation::error::{IngotError, IngotResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl TextBrushRgba8 {
    /// Opaque white, used when text is rasterized as a coverage mask.
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };
}

/// Engraving font: raw bytes plus the family name registered from them.
#[derive(Clone)]
pub struct EngravingFont {
    bytes: Arc<Vec<u8>>,
    family: String,
}

impl std::fmt::Debug for EngravingFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngravingFont")
            .field("font_bytes_len", &self.bytes.len())
            .field("family", &self.family)
            .finish()
    }
}

impl EngravingFont {
    /// Read a TTF/OTF file.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> IngotResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            IngotError::validation(format!("failed to read font '{}': {e}", path.display()))
        })?;
        Self::from_bytes(bytes)
    }

    /// Validate font bytes by registering them in a throwaway font collection.
    pub fn from_bytes(bytes: Vec<u8>) -> IngotResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            IngotError::validation("no font families registered from font bytes")
        })?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| IngotError::validation("registered font family has no name"))?
            .to_string();
        Ok(Self {
            bytes: Arc::new(bytes),
            family,
        })
    }

    /// Family name detected from the font data.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Raw font bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn font_data(&self) -> vello_cpu::peniko::FontData {
        vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(self.bytes.as_ref().clone()),
            0,
        )
    }
}

/// Stateful helper for building Parley text layouts from an [`EngravingFont`].
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    registered_family: Option<String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered_family: None,
        }
    }

    /// Shape and lay out a single line of text.
    pub fn layout_line(
        &mut self,
        text: &str,
        font: &EngravingFont,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> IngotResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(IngotError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        if self.registered_family.as_deref() != Some(font.family()) {
            self.font_ctx
                .collection
                .register_fonts(parley::fontique::Blob::from(font.bytes().to_vec()), None);
            self.registered_family = Some(font.family().to_string());
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(font.family().to_string())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/text.rs"]
mod tests;
