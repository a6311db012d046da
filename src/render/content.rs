//! Rasterized engraving content and the per-layer compositing that reads from it.

use crate::{
    assets::bitmap::Bitmap,
    assets::text::{EngravingFont, TextBrushRgba8, TextLayoutEngine},
    foundation::core::{Affine, PlacementSettings, Point, Rgb8},
    foundation::error::{IngotError, IngotResult},
    foundation::math::{luma601, px_index, unit_to_u8},
    render::blend::blend_px,
    render::layers::{DepthLayer, max_reach},
    surface::mapper::SurfaceArea,
    surface::raster::{CpuSurface, RasterSurface},
};

/// Share of the engraving area a logo may occupy before `scale`.
pub const LOGO_FIT_RATIO: f64 = 0.7;

/// Font size heuristic: `min(area_w / chars * width_factor, area_h * height_factor) * scale`,
/// clamped to `[min_px, max_px]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FontSizing {
    /// Multiplier on the per-character width budget.
    pub width_factor: f64,
    /// Multiplier on the area height.
    pub height_factor: f64,
    /// Smallest allowed size in pixels.
    pub min_px: f64,
    /// Largest allowed size in pixels.
    pub max_px: f64,
}

impl Default for FontSizing {
    fn default() -> Self {
        Self {
            width_factor: 1.2,
            height_factor: 0.7,
            min_px: 8.0,
            max_px: 160.0,
        }
    }
}

impl FontSizing {
    /// Reject non-positive factors or an inverted size range.
    pub fn validate(&self) -> IngotResult<()> {
        let all = [self.width_factor, self.height_factor, self.min_px, self.max_px];
        if all.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(IngotError::validation(
                "font sizing factors and limits must be finite and > 0",
            ));
        }
        if self.min_px > self.max_px {
            return Err(IngotError::validation("font sizing min_px must be <= max_px"));
        }
        Ok(())
    }

    /// Font size in pixels for `chars` characters in an `area_w x area_h` area.
    pub fn size_px(&self, area_w: f64, area_h: f64, chars: usize, scale: f64) -> f64 {
        let chars = chars.max(1) as f64;
        let fit = (area_w / chars * self.width_factor).min(area_h * self.height_factor);
        (fit * scale).clamp(self.min_px, self.max_px)
    }
}

/// Keep at most `max_length` characters.
pub fn truncate_chars(text: &str, max_length: usize) -> &str {
    match text.char_indices().nth(max_length) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Engraving-style recolor: darker source pixels become stronger engraving color.
///
/// `intensity = 1 - luma / 255`, color `engraving * intensity`, alpha
/// `src_alpha * (0.4 + 0.6 * intensity)`. Works on straight alpha and returns a premultiplied
/// bitmap.
pub fn recolor_logo(logo: &Bitmap, engraving: Rgb8) -> IngotResult<Bitmap> {
    let mut px = logo.to_straight_rgba8();
    for p in px.chunks_exact_mut(4) {
        let intensity = 1.0 - luma601(p[0], p[1], p[2]) / 255.0;
        let alpha = f32::from(p[3]) / 255.0 * (0.4 + 0.6 * intensity);
        p[0] = unit_to_u8(f32::from(engraving.r) / 255.0 * intensity);
        p[1] = unit_to_u8(f32::from(engraving.g) / 255.0 * intensity);
        p[2] = unit_to_u8(f32::from(engraving.b) / 255.0 * intensity);
        p[3] = unit_to_u8(alpha);
    }
    crate::foundation::math::premultiply_rgba8_in_place(&mut px);
    Bitmap::from_premul(logo.width, logo.height, px)
}

/// Largest `(w, h)` with the logo's aspect that fits in `LOGO_FIT_RATIO` of the area.
pub fn fit_logo(logo_w: u32, logo_h: u32, area_w: f64, area_h: f64) -> (f64, f64) {
    let (lw, lh) = (f64::from(logo_w), f64::from(logo_h));
    let (bw, bh) = (area_w * LOGO_FIT_RATIO, area_h * LOGO_FIT_RATIO);
    let k = (bw / lw).min(bh / lh);
    (lw * k, lh * k)
}

/// Content drawn once at zero offset on a canvas-sized scratch surface.
///
/// Depth layers resample this mask instead of redrawing the content.
pub struct ContentMask {
    surface: CpuSurface,
    bounds: Option<(u32, u32, u32, u32)>,
}

impl ContentMask {
    /// Shape `text` at `size_px` and draw it white, centered in the area under `placement`.
    #[allow(clippy::too_many_arguments)]
    pub fn text(
        width: u32,
        height: u32,
        engine: &mut TextLayoutEngine,
        font: &EngravingFont,
        text: &str,
        size_px: f64,
        area: &SurfaceArea,
        placement: &PlacementSettings,
    ) -> IngotResult<Self> {
        let layout = engine.layout_line(text, font, size_px as f32, TextBrushRgba8::WHITE)?;
        let (lw, lh) = (f64::from(layout.width()), f64::from(layout.height()));
        let (aw, ah) = area.local_size();
        let transform = area.local_to_canvas()
            * placement.rigid_transform(Point::new(aw / 2.0, ah / 2.0))
            * Affine::translate((-lw / 2.0, -lh / 2.0));

        let mut surface = CpuSurface::new(width, height)?;
        surface.fill_text(&layout, font, transform)?;
        Ok(Self::from_surface(surface))
    }

    /// Draw an already recolored logo fitted into the area under `placement`.
    pub fn logo(
        width: u32,
        height: u32,
        recolored: &Bitmap,
        area: &SurfaceArea,
        placement: &PlacementSettings,
    ) -> IngotResult<Self> {
        let (aw, ah) = area.local_size();
        let (fw, fh) = fit_logo(recolored.width, recolored.height, aw, ah);
        let transform = area.local_to_canvas()
            * placement.content_transform(Point::new(aw / 2.0, ah / 2.0))
            * Affine::translate((-fw / 2.0, -fh / 2.0))
            * Affine::scale_non_uniform(
                fw / f64::from(recolored.width),
                fh / f64::from(recolored.height),
            );

        let mut surface = CpuSurface::new(width, height)?;
        surface.draw_image(recolored, transform, 1.0)?;
        Ok(Self::from_surface(surface))
    }

    fn from_surface(surface: CpuSurface) -> Self {
        let bounds = coverage_bounds(&surface);
        Self { surface, bounds }
    }

    /// `true` when nothing was drawn (e.g. content placed entirely off-canvas).
    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    /// Inclusive pixel bounds `(x0, y0, x1, y1)` of non-transparent mask pixels.
    pub fn bounds(&self) -> Option<(u32, u32, u32, u32)> {
        self.bounds
    }

    /// Composite every layer onto `dst`, back to front.
    ///
    /// Each layer reads the mask at `(x, y) - offset` with bilinear filtering, so sub-pixel
    /// offsets stay sub-pixel.
    pub fn composite_layers(
        &self,
        dst: &mut dyn RasterSurface,
        layers: &[DepthLayer],
        opacity: f32,
    ) -> IngotResult<()> {
        if dst.width() != self.surface.width() || dst.height() != self.surface.height() {
            return Err(IngotError::validation(
                "content mask and destination surface sizes differ",
            ));
        }
        let Some((x0, y0, x1, y1)) = self.bounds else {
            return Ok(());
        };
        let opacity = opacity.clamp(0.0, 1.0);
        if opacity <= 0.0 {
            return Ok(());
        }

        let (w, h) = (dst.width(), dst.height());
        let reach = max_reach(layers) + 1;
        let rx0 = x0.saturating_sub(reach);
        let ry0 = y0.saturating_sub(reach);
        let rx1 = (x1 + reach).min(w - 1);
        let ry1 = (y1 + reach).min(h - 1);

        let pixels = dst.pixels_mut();
        for layer in layers {
            let layer_alpha = layer.alpha * opacity;
            if layer_alpha <= 0.0 {
                continue;
            }
            tracing::trace!(layer = layer.name, "compositing depth layer");
            let (dx, dy) = (layer.offset.x as f32, layer.offset.y as f32);
            for y in ry0..=ry1 {
                for x in rx0..=rx1 {
                    let m = self.sample(x as f32 - dx, y as f32 - dy);
                    if m[3] <= 0.0 {
                        continue;
                    }
                    let src = match layer.tint {
                        Some(c) => {
                            let a = m[3] * layer_alpha;
                            [
                                f32::from(c.r) / 255.0 * a,
                                f32::from(c.g) / 255.0 * a,
                                f32::from(c.b) / 255.0 * a,
                                a,
                            ]
                        }
                        None => m.map(|v| v * layer_alpha),
                    };
                    let i = px_index(x, y, w);
                    blend_px(&mut pixels[i..i + 4], src, layer.blend);
                }
            }
        }
        Ok(())
    }

    /// Bilinear premultiplied sample in `[0, 1]`; outside the surface is transparent.
    fn sample(&self, fx: f32, fy: f32) -> [f32; 4] {
        let x0 = fx.floor();
        let y0 = fy.floor();
        let tx = fx - x0;
        let ty = fy - y0;
        let (x0, y0) = (x0 as i64, y0 as i64);

        let mut out = [0.0f32; 4];
        for (ox, oy, wgt) in [
            (0, 0, (1.0 - tx) * (1.0 - ty)),
            (1, 0, tx * (1.0 - ty)),
            (0, 1, (1.0 - tx) * ty),
            (1, 1, tx * ty),
        ] {
            if wgt <= 0.0 {
                continue;
            }
            if let Some(p) = self.texel(x0 + ox, y0 + oy) {
                for (o, v) in out.iter_mut().zip(p) {
                    *o += f32::from(v) / 255.0 * wgt;
                }
            }
        }
        out
    }

    fn texel(&self, x: i64, y: i64) -> Option<[u8; 4]> {
        let (w, h) = (
            i64::from(self.surface.width()),
            i64::from(self.surface.height()),
        );
        if x < 0 || y < 0 || x >= w || y >= h {
            return None;
        }
        let i = ((y * w + x) * 4) as usize;
        let p = &self.surface.pixels()[i..i + 4];
        Some([p[0], p[1], p[2], p[3]])
    }
}

fn coverage_bounds(surface: &CpuSurface) -> Option<(u32, u32, u32, u32)> {
    let w = surface.width();
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (i, px) in surface.pixels().chunks_exact(4).enumerate() {
        if px[3] == 0 {
            continue;
        }
        let (x, y) = ((i % w as usize) as u32, (i / w as usize) as u32);
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    bounds
}

#[cfg(test)]
#[path = "../../tests/unit/render/content.rs"]
mod tests;
