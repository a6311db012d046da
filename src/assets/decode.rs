use anyhow::Context;

use crate::{
    assets::bitmap::Bitmap,
    foundation::error::{IngotError, IngotResult},
    foundation::math::premultiply_rgba8_in_place,
};

// Large enough for print-resolution logos, small enough to bound allocations.
const MAX_SVG_DIM: u32 = 8_192;

/// Decode encoded image bytes (PNG, JPEG, GIF, WebP, ... or SVG) into a premultiplied bitmap.
pub fn decode_image(bytes: &[u8]) -> IngotResult<Bitmap> {
    if looks_like_svg(bytes) {
        return decode_svg(bytes);
    }
    decode_raster(bytes).map_err(|e| IngotError::decode(format!("{e:#}")))
}

fn decode_raster(bytes: &[u8]) -> anyhow::Result<Bitmap> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(Bitmap::from_premul(width, height, rgba8_premul)?)
}

/// Parse and rasterize an SVG document at its intrinsic size.
pub fn decode_svg(bytes: &[u8]) -> IngotResult<Bitmap> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts)
        .context("parse svg tree")
        .map_err(|e| IngotError::decode(format!("{e:#}")))?;

    let size = tree.size();
    let to_px = |v: f32| -> IngotResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(IngotError::decode("svg has invalid width/height"));
        }
        Ok((v.ceil() as u32).clamp(1, MAX_SVG_DIM))
    };
    let width = to_px(size.width())?;
    let height = to_px(size.height())?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| IngotError::decode("failed to allocate svg pixmap"))?;
    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    // tiny-skia pixmaps are already premultiplied RGBA8.
    Bitmap::from_premul(width, height, pixmap.data().to_vec())
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let Ok(text) = std::str::from_utf8(head) else {
        return false;
    };
    let t = text.trim_start_matches('\u{feff}').trim_start();
    t.starts_with("<svg") || (t.starts_with("<?xml") && t.contains("<svg"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
