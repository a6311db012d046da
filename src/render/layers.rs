//! Depth layer tables for the engraved look.
//!
//! The same content shape is composited several times, back to front. Shadows sit down-right of
//! the main layer and get lighter as they approach it; highlights sit up-left.

use crate::foundation::core::{ENGRAVING_COLOR, Rgb8, Vec2};
use crate::render::blend::BlendMode;

/// Which content path a layer stack is built for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// Shaped text, rasterized as a coverage mask.
    Text,
    /// Recolored logo bitmap.
    Logo,
}

/// One pass of the content shape.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthLayer {
    /// Short name for logs.
    pub name: &'static str,
    /// Flat tint; `None` keeps the content's own (already recolored) pixels.
    pub tint: Option<Rgb8>,
    /// Layer alpha before the placement opacity is applied.
    pub alpha: f32,
    /// Canvas-space offset in pixels.
    pub offset: Vec2,
    /// How the layer combines with what is below it.
    pub blend: BlendMode,
}

impl DepthLayer {
    const fn new(
        name: &'static str,
        tint: Option<Rgb8>,
        alpha: f32,
        offset: (f64, f64),
        blend: BlendMode,
    ) -> Self {
        Self {
            name,
            tint,
            alpha,
            offset: Vec2::new(offset.0, offset.1),
            blend,
        }
    }
}

const TEXT_LAYERS: [DepthLayer; 6] = [
    DepthLayer::new(
        "deep_shadow",
        Some(Rgb8::new(30, 20, 10)),
        0.72,
        (2.0, 3.0),
        BlendMode::Normal,
    ),
    DepthLayer::new(
        "medium_shadow",
        Some(Rgb8::new(50, 35, 20)),
        0.42,
        (1.0, 2.0),
        BlendMode::Normal,
    ),
    DepthLayer::new(
        "light_shadow",
        Some(Rgb8::new(70, 50, 28)),
        0.25,
        (0.5, 1.0),
        BlendMode::Normal,
    ),
    DepthLayer::new(
        "main",
        Some(ENGRAVING_COLOR),
        1.0,
        (0.0, 0.0),
        BlendMode::Normal,
    ),
    DepthLayer::new(
        "highlight",
        Some(Rgb8::new(255, 215, 0)),
        0.28,
        (-0.5, -0.5),
        BlendMode::Normal,
    ),
    DepthLayer::new(
        "bright_highlight",
        Some(Rgb8::new(255, 255, 255)),
        0.18,
        (-1.0, -1.0),
        BlendMode::Normal,
    ),
];

const LOGO_LAYERS: [DepthLayer; 4] = [
    DepthLayer::new("deep_shadow", None, 0.8, (2.0, 3.0), BlendMode::Multiply),
    DepthLayer::new("medium_shadow", None, 0.6, (1.0, 1.5), BlendMode::Multiply),
    DepthLayer::new("main", None, 1.0, (0.0, 0.0), BlendMode::Normal),
    DepthLayer::new("highlight", None, 0.3, (-0.5, -0.5), BlendMode::Screen),
];

/// Back-to-front layer stack for `kind`, with offsets multiplied by `depth`.
///
/// A non-finite or negative `depth` is treated as `0` (all layers stacked on the main one).
pub fn depth_layers(kind: ContentKind, depth: f64) -> Vec<DepthLayer> {
    let depth = if depth.is_finite() { depth.max(0.0) } else { 0.0 };
    let table: &[DepthLayer] = match kind {
        ContentKind::Text => &TEXT_LAYERS,
        ContentKind::Logo => &LOGO_LAYERS,
    };
    table
        .iter()
        .map(|l| DepthLayer {
            offset: l.offset * depth,
            ..*l
        })
        .collect()
}

/// Largest absolute offset component in a stack, in whole pixels (rounded up).
pub(crate) fn max_reach(layers: &[DepthLayer]) -> u32 {
    layers
        .iter()
        .map(|l| l.offset.x.abs().max(l.offset.y.abs()))
        .fold(0.0f64, f64::max)
        .ceil() as u32
}

#[cfg(test)]
#[path = "../../tests/unit/render/layers.rs"]
mod tests;
