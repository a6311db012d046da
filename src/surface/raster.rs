use std::io::Cursor;
use std::sync::Arc;

use crate::{
    assets::bitmap::Bitmap,
    assets::text::{EngravingFont, TextBrushRgba8},
    foundation::core::Affine,
    foundation::error::{IngotError, IngotResult},
    foundation::math::unpremultiply_rgba8,
    render::blend::over_in_place,
};

/// 2D raster capability the compositor draws through.
///
/// Pixels are row-major premultiplied RGBA8. Drawing operations composite source-over onto the
/// existing contents.
pub trait RasterSurface {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Reset every pixel to transparent.
    fn clear(&mut self);

    /// Draw `image` (its pixel rectangle `0..w x 0..h`) under `transform`.
    fn draw_image(&mut self, image: &Bitmap, transform: Affine, opacity: f32) -> IngotResult<()>;

    /// Fill a shaped text layout under `transform` using each run's brush color.
    fn fill_text(
        &mut self,
        layout: &parley::Layout<TextBrushRgba8>,
        font: &EngravingFont,
        transform: Affine,
    ) -> IngotResult<()>;

    /// Read-only pixel access.
    fn pixels(&self) -> &[u8];

    /// Mutable pixel access for per-pixel passes.
    fn pixels_mut(&mut self) -> &mut [u8];

    /// Encode the current contents.
    fn encode(&self, format: image::ImageFormat) -> IngotResult<Vec<u8>> {
        encode_premul_rgba8(self.pixels(), self.width(), self.height(), format)
    }
}

/// CPU surface backed by a premultiplied RGBA8 buffer, rasterizing through `vello_cpu`.
#[derive(Clone, Debug)]
pub struct CpuSurface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl CpuSurface {
    /// Allocate a transparent surface.
    pub fn new(width: u32, height: u32) -> IngotResult<Self> {
        surface_dims_u16(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0u8; (width as usize) * (height as usize) * 4],
        })
    }

    /// Snapshot the surface as a [`Bitmap`].
    pub fn to_bitmap(&self) -> IngotResult<Bitmap> {
        Bitmap::from_premul(self.width, self.height, self.data.clone())
    }

    /// Consume the surface into a [`Bitmap`] without copying.
    pub fn into_bitmap(self) -> IngotResult<Bitmap> {
        Bitmap::from_premul(self.width, self.height, self.data)
    }

    fn rasterize(
        &self,
        draw: impl FnOnce(&mut vello_cpu::RenderContext) -> IngotResult<()>,
    ) -> IngotResult<vello_cpu::Pixmap> {
        let (w, h) = surface_dims_u16(self.width, self.height)?;
        let mut ctx = vello_cpu::RenderContext::new(w, h);
        draw(&mut ctx)?;
        ctx.flush();
        let mut scratch = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut scratch);
        Ok(scratch)
    }
}

impl RasterSurface for CpuSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.data.fill(0);
    }

    fn draw_image(&mut self, image: &Bitmap, transform: Affine, opacity: f32) -> IngotResult<()> {
        let max = u32::from(u16::MAX);
        let fitted = image.downscaled_to_fit(max, max)?;
        let transform = transform
            * Affine::scale_non_uniform(
                f64::from(image.width) / f64::from(fitted.width),
                f64::from(image.height) / f64::from(fitted.height),
            );
        if fitted.width != image.width || fitted.height != image.height {
            tracing::debug!(
                from = ?(image.width, image.height),
                to = ?(fitted.width, fitted.height),
                "downscaled oversized source image"
            );
        }
        let image = &fitted;
        let pixmap = pixmap_from_premul_bytes(&image.rgba8_premul, image.width, image.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        let scratch = self.rasterize(|ctx| {
            ctx.set_transform(affine_to_cpu(transform));
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(image.width),
                f64::from(image.height),
            ));
            Ok(())
        })?;
        over_in_place(&mut self.data, scratch.data_as_u8_slice(), opacity)
    }

    fn fill_text(
        &mut self,
        layout: &parley::Layout<TextBrushRgba8>,
        font: &EngravingFont,
        transform: Affine,
    ) -> IngotResult<()> {
        let font_data = font.font_data();
        let scratch = self.rasterize(|ctx| {
            ctx.set_transform(affine_to_cpu(transform));
            for line in layout.lines() {
                for item in line.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };
                    let brush = run.style().brush;
                    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                        brush.r, brush.g, brush.b, brush.a,
                    ));
                    let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    ctx.glyph_run(&font_data)
                        .font_size(run.run().font_size())
                        .fill_glyphs(glyphs);
                }
            }
            Ok(())
        })?;
        over_in_place(&mut self.data, scratch.data_as_u8_slice(), 1.0)
    }

    fn pixels(&self) -> &[u8] {
        &self.data
    }

    fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

/// Encode premultiplied RGBA8 pixels into `format` (PNG keeps alpha, JPEG drops it).
pub fn encode_premul_rgba8(
    premul: &[u8],
    width: u32,
    height: u32,
    format: image::ImageFormat,
) -> IngotResult<Vec<u8>> {
    let straight = unpremultiply_rgba8(premul);
    let rgba = image::RgbaImage::from_raw(width, height, straight)
        .ok_or_else(|| IngotError::validation("pixel buffer does not match dimensions"))?;
    let dyn_img = match format {
        image::ImageFormat::Jpeg => image::DynamicImage::ImageRgb8(
            image::DynamicImage::ImageRgba8(rgba).to_rgb8(),
        ),
        _ => image::DynamicImage::ImageRgba8(rgba),
    };
    let mut out = Vec::new();
    dyn_img
        .write_to(&mut Cursor::new(&mut out), format)
        .map_err(|e| IngotError::Other(anyhow::Error::new(e).context("encode output image")))?;
    Ok(out)
}

fn surface_dims_u16(width: u32, height: u32) -> IngotResult<(u16, u16)> {
    if width == 0 || height == 0 {
        return Err(IngotError::validation("surface dimensions must be > 0"));
    }
    let w: u16 = width
        .try_into()
        .map_err(|_| IngotError::validation("surface width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| IngotError::validation("surface height exceeds u16"))?;
    Ok((w, h))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> IngotResult<vello_cpu::Pixmap> {
    let (w, h) = surface_dims_u16(width, height)?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(IngotError::validation("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/surface/raster.rs"]
mod tests;
