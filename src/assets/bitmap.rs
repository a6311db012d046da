use std::sync::Arc;

use crate::foundation::error::{IngotError, IngotResult};

/// Decoded raster image in premultiplied RGBA8 form.
///
/// Pixel storage is shared, so clones are cheap and loader caches can hand out the same bitmap
/// to several renders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl Bitmap {
    /// Wrap premultiplied pixels, checking the buffer length.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> IngotResult<Self> {
        if width == 0 || height == 0 {
            return Err(IngotError::decode("bitmap must have non-zero dimensions"));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| IngotError::decode("bitmap size overflow"))?;
        if rgba8_premul.len() != expected {
            return Err(IngotError::decode(format!(
                "bitmap byte len {} does not match {width}x{height}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Uniformly filled bitmap; `rgba` is straight alpha.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> IngotResult<Self> {
        let mut px = rgba;
        crate::foundation::math::premultiply_rgba8_in_place(&mut px);
        let n = (width as usize).saturating_mul(height as usize);
        Self::from_premul(width, height, px.repeat(n))
    }

    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let p = &self.rgba8_premul[i..i + 4];
        Some([p[0], p[1], p[2], p[3]])
    }

    /// Straight-alpha copy of the pixels.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        crate::foundation::math::unpremultiply_rgba8(&self.rgba8_premul)
    }

    /// Copy shrunk (aspect preserved) so neither side exceeds `max_w x max_h`; `self` when it
    /// already fits.
    pub fn downscaled_to_fit(&self, max_w: u32, max_h: u32) -> IngotResult<Self> {
        if max_w == 0 || max_h == 0 {
            return Err(IngotError::validation("downscale target must be non-zero"));
        }
        if self.width <= max_w && self.height <= max_h {
            return Ok(self.clone());
        }
        let k = (f64::from(max_w) / f64::from(self.width))
            .min(f64::from(max_h) / f64::from(self.height));
        let w = ((f64::from(self.width) * k).round() as u32).clamp(1, max_w);
        let h = ((f64::from(self.height) * k).round() as u32).clamp(1, max_h);

        // Filtering premultiplied channels directly keeps edges free of color fringes.
        let src = image::RgbaImage::from_raw(self.width, self.height, self.rgba8_premul.to_vec())
            .ok_or_else(|| IngotError::decode("bitmap byte len does not match dimensions"))?;
        let small = image::imageops::resize(&src, w, h, image::imageops::FilterType::Triangle);
        Self::from_premul(w, h, small.into_raw())
    }

    /// Width over height.
    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/bitmap.rs"]
mod tests;
