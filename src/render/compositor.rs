use crate::{
    assets::bitmap::Bitmap,
    assets::text::{EngravingFont, TextLayoutEngine},
    config::CompositorConfig,
    foundation::core::{Affine, ENGRAVING_COLOR, PlacementSettings, Rect},
    foundation::error::{IngotError, IngotResult},
    render::content::{ContentMask, recolor_logo},
    render::effects,
    render::layers::{ContentKind, depth_layers},
    render::output::{RenderMetadata, RenderResult},
    request::{Content, EngravingRequest},
    surface::mapper::{SurfaceArea, SurfaceMapper},
    surface::raster::{CpuSurface, RasterSurface},
};

enum Job<'a> {
    Text(&'a str),
    Logo(&'a Bitmap),
}

/// Draws engraving content onto a letterboxed base image.
///
/// Every call to [`EngravingCompositor::render`] allocates fresh surfaces, so results never
/// carry pixels from an earlier render.
pub struct EngravingCompositor {
    config: CompositorConfig,
    mapper: SurfaceMapper,
    font: Option<EngravingFont>,
    text_engine: TextLayoutEngine,
}

impl EngravingCompositor {
    /// Build a compositor from a validated config. Text rendering also needs a font, see
    /// [`EngravingCompositor::with_font`].
    pub fn new(config: CompositorConfig) -> IngotResult<Self> {
        config.validate()?;
        Ok(Self {
            mapper: SurfaceMapper::new(config.area)?,
            config,
            font: None,
            text_engine: TextLayoutEngine::new(),
        })
    }

    /// Use `font` for text engravings.
    pub fn with_font(mut self, font: EngravingFont) -> Self {
        self.font = Some(font);
        self
    }

    /// Settings in effect.
    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    /// Area mapper built from the config's ratios.
    pub fn mapper(&self) -> &SurfaceMapper {
        &self.mapper
    }

    /// Render `request` over `base`. `logo` must be present when the request resolves to the
    /// logo path.
    #[tracing::instrument(skip_all, fields(mode = ?request.mode))]
    pub fn render(
        &mut self,
        request: &EngravingRequest,
        base: &Bitmap,
        logo: Option<&Bitmap>,
    ) -> IngotResult<RenderResult> {
        let content = match request.content(self.config.text_max_length) {
            Ok(c) => c,
            Err(IngotError::NoContent) if self.config.base_only_without_content => {
                tracing::debug!("no content, rendering base only");
                return self.render_base(base);
            }
            Err(e) => return Err(e),
        };
        let job = match content {
            Content::Text { value, .. } => {
                if self.font.is_none() {
                    return Err(IngotError::validation(
                        "text engraving needs a font (EngravingCompositor::with_font)",
                    ));
                }
                Job::Text(value)
            }
            Content::Logo { image_ref } => Job::Logo(logo.ok_or_else(|| {
                IngotError::logo_unavailable(format!("{} is not loaded", image_ref.describe()))
            })?),
        };

        let placement = request.placement.normalized(&self.config.placement_bounds);
        let mut surface = CpuSurface::new(self.config.width, self.config.height)?;
        let base_bounds = draw_letterboxed(&mut surface, base)?;
        let mode = request.mode_or(self.config.mode);
        let area = self.mapper.compute_area(base_bounds, mode)?;
        tracing::debug!(?area, "engraving area");

        let metadata = match job {
            Job::Text(text) => {
                self.engrave_text(&mut surface, text, &area, &placement)?;
                RenderMetadata::TEXT
            }
            Job::Logo(logo) => {
                self.engrave_logo(&mut surface, logo, &area, &placement)?;
                RenderMetadata::LOGO
            }
        };
        effects::metallic_highlights(&mut surface, &area);

        Ok(RenderResult {
            bitmap: surface.into_bitmap()?,
            area: Some(area),
            metadata,
        })
    }

    /// The letterboxed base image with nothing engraved.
    pub fn render_base(&self, base: &Bitmap) -> IngotResult<RenderResult> {
        let mut surface = CpuSurface::new(self.config.width, self.config.height)?;
        draw_letterboxed(&mut surface, base)?;
        Ok(RenderResult {
            bitmap: surface.into_bitmap()?,
            area: None,
            metadata: RenderMetadata::BASE_ONLY,
        })
    }

    fn engrave_text(
        &mut self,
        surface: &mut CpuSurface,
        text: &str,
        area: &SurfaceArea,
        placement: &PlacementSettings,
    ) -> IngotResult<()> {
        let font = self
            .font
            .as_ref()
            .ok_or_else(|| IngotError::validation("text engraving needs a font"))?;
        let (aw, ah) = area.local_size();
        let size_px =
            self.config
                .font_sizing
                .size_px(aw, ah, text.chars().count(), placement.scale());
        tracing::debug!(chars = text.chars().count(), size_px, "engraving text");

        effects::engraving_depression(surface, area);
        let mask = ContentMask::text(
            surface.width(),
            surface.height(),
            &mut self.text_engine,
            font,
            text,
            size_px,
            area,
            placement,
        )?;
        trace_mask(&mask);
        mask.composite_layers(
            surface,
            &depth_layers(ContentKind::Text, self.config.depth),
            placement.opacity() as f32,
        )
    }

    fn engrave_logo(
        &self,
        surface: &mut CpuSurface,
        logo: &Bitmap,
        area: &SurfaceArea,
        placement: &PlacementSettings,
    ) -> IngotResult<()> {
        tracing::debug!(width = logo.width, height = logo.height, "engraving logo");
        effects::surface_integration(surface, area);
        let recolored = recolor_logo(logo, ENGRAVING_COLOR)?;
        let mask = ContentMask::logo(
            surface.width(),
            surface.height(),
            &recolored,
            area,
            placement,
        )?;
        trace_mask(&mask);
        mask.composite_layers(
            surface,
            &depth_layers(ContentKind::Logo, self.config.depth),
            placement.opacity() as f32,
        )
    }
}

fn trace_mask(mask: &ContentMask) {
    if mask.is_empty() {
        tracing::debug!("content landed entirely off-canvas");
    } else {
        tracing::trace!(bounds = ?mask.bounds(), "content mask");
    }
}

/// Draw `base` fitted inside the surface with its aspect preserved and centered; returns the
/// drawn bounds.
pub fn draw_letterboxed(surface: &mut dyn RasterSurface, base: &Bitmap) -> IngotResult<Rect> {
    let bounds = letterbox_bounds(base.width, base.height, surface.width(), surface.height());
    let k = bounds.width() / f64::from(base.width);
    surface.draw_image(
        base,
        Affine::translate((bounds.x0, bounds.y0)) * Affine::scale(k),
        1.0,
    )?;
    Ok(bounds)
}

/// Contain-fit rectangle of a `src_w x src_h` image centered in a `dst_w x dst_h` canvas.
pub fn letterbox_bounds(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> Rect {
    let (sw, sh) = (f64::from(src_w), f64::from(src_h));
    let (dw, dh) = (f64::from(dst_w), f64::from(dst_h));
    let k = (dw / sw).min(dh / sh);
    let (w, h) = (sw * k, sh * k);
    Rect::from_origin_size(((dw - w) / 2.0, (dh - h) / 2.0), (w, h))
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
