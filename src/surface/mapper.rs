//! Engraving area placement relative to the drawn base image.
//!
//! All positions are fixed ratios of the base image's on-canvas bounding box, never of the
//! canvas itself, so the area follows the product when the image is letterboxed.

use crate::foundation::core::{Affine, Point, Rect};
use crate::foundation::error::{IngotError, IngotResult};

/// How content is placed on the product surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingMode {
    /// Axis-aligned rectangle.
    #[default]
    Rect,
    /// Trapezoid approximating an angled metal face.
    Perspective,
}

/// Axis-aligned band, as fractions of the base bounds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RectRatios {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

/// Trapezoid corners as `[x, y]` fractions of the base bounds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QuadRatios {
    /// Top-left corner.
    pub top_left: [f64; 2],
    /// Top-right corner.
    pub top_right: [f64; 2],
    /// Bottom-left corner.
    pub bottom_left: [f64; 2],
    /// Bottom-right corner.
    pub bottom_right: [f64; 2],
}

/// Canonical engraving-area ratios.
///
/// Rect: horizontal band 25%..75%, starting at 70% height, 15% tall.
/// Perspective: top edge 27%..73% at 70% height, bottom edge 25%..75% at 85% height.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AreaRatios {
    /// Ratios used by [`MappingMode::Rect`].
    pub rect: RectRatios,
    /// Ratios used by [`MappingMode::Perspective`].
    pub quad: QuadRatios,
}

impl Default for AreaRatios {
    fn default() -> Self {
        Self {
            rect: RectRatios {
                x: 0.25,
                y: 0.70,
                width: 0.50,
                height: 0.15,
            },
            quad: QuadRatios {
                top_left: [0.27, 0.70],
                top_right: [0.73, 0.70],
                bottom_left: [0.25, 0.85],
                bottom_right: [0.75, 0.85],
            },
        }
    }
}

impl AreaRatios {
    /// Reject ratios that would leave the base bounds or collapse the area.
    pub fn validate(&self) -> IngotResult<()> {
        let unit = |name: &str, v: f64| -> IngotResult<()> {
            if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                return Err(IngotError::validation(format!(
                    "area ratio {name} = {v} must be within [0, 1]"
                )));
            }
            Ok(())
        };

        let r = self.rect;
        for (name, v) in [
            ("rect.x", r.x),
            ("rect.y", r.y),
            ("rect.width", r.width),
            ("rect.height", r.height),
        ] {
            unit(name, v)?;
        }
        if r.width <= 0.0 || r.height <= 0.0 {
            return Err(IngotError::validation("rect area must have positive size"));
        }
        if r.x + r.width > 1.0 + 1e-9 || r.y + r.height > 1.0 + 1e-9 {
            return Err(IngotError::validation(
                "rect area must stay inside the base bounds",
            ));
        }

        let q = self.quad;
        for (name, [x, y]) in [
            ("quad.top_left", q.top_left),
            ("quad.top_right", q.top_right),
            ("quad.bottom_left", q.bottom_left),
            ("quad.bottom_right", q.bottom_right),
        ] {
            unit(name, x)?;
            unit(name, y)?;
        }
        if q.top_right[0] <= q.top_left[0] || q.bottom_right[0] <= q.bottom_left[0] {
            return Err(IngotError::validation(
                "quad right corners must be right of left corners",
            ));
        }
        if q.bottom_left[1] <= q.top_left[1] || q.bottom_right[1] <= q.top_right[1] {
            return Err(IngotError::validation(
                "quad bottom corners must be below top corners",
            ));
        }
        Ok(())
    }
}

/// Four-corner perspective approximation.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Quad {
    /// Top-left corner.
    pub top_left: Point,
    /// Top-right corner.
    pub top_right: Point,
    /// Bottom-left corner.
    pub bottom_left: Point,
    /// Bottom-right corner.
    pub bottom_right: Point,
}

/// Region of the canvas that receives engraving content.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceArea {
    /// Axis-aligned rectangle in canvas pixels.
    Rect(Rect),
    /// Perspective trapezoid in canvas pixels.
    Quad(Quad),
}

impl SurfaceArea {
    /// Every corner of the area.
    pub fn corners(&self) -> [Point; 4] {
        match *self {
            Self::Rect(r) => [
                Point::new(r.x0, r.y0),
                Point::new(r.x1, r.y0),
                Point::new(r.x0, r.y1),
                Point::new(r.x1, r.y1),
            ],
            Self::Quad(q) => [q.top_left, q.top_right, q.bottom_left, q.bottom_right],
        }
    }

    /// Smallest axis-aligned rectangle containing the area.
    pub fn bounding_rect(&self) -> Rect {
        let [a, b, c, d] = self.corners();
        Rect::from_points(a, b).union_pt(c).union_pt(d)
    }

    /// Size of the area-local frame content is laid out in.
    ///
    /// For a quad this is the top edge width by the vertical extent of the left edge.
    pub fn local_size(&self) -> (f64, f64) {
        match *self {
            Self::Rect(r) => (r.width(), r.height()),
            Self::Quad(q) => (
                (q.top_right - q.top_left).hypot(),
                (q.bottom_left.y - q.top_left.y).abs(),
            ),
        }
    }

    /// Maps area-local coordinates onto the canvas.
    ///
    /// A quad maps through the parallelogram spanned by its top-left, top-right and
    /// bottom-left corners; the bottom-right corner is not a projective constraint.
    pub fn local_to_canvas(&self) -> Affine {
        match *self {
            Self::Rect(r) => Affine::translate((r.x0, r.y0)),
            Self::Quad(q) => {
                let (w, h) = self.local_size();
                let u = (q.top_right - q.top_left) / w;
                let v = (q.bottom_left - q.top_left) / h;
                Affine::new([u.x, u.y, v.x, v.y, q.top_left.x, q.top_left.y])
            }
        }
    }
}

/// Computes engraving areas from base image bounds.
#[derive(Clone, Copy, Debug, Default)]
pub struct SurfaceMapper {
    ratios: AreaRatios,
}

impl SurfaceMapper {
    /// Build a mapper with validated ratios.
    pub fn new(ratios: AreaRatios) -> IngotResult<Self> {
        ratios.validate()?;
        Ok(Self { ratios })
    }

    /// Ratios in effect.
    pub fn ratios(&self) -> &AreaRatios {
        &self.ratios
    }

    /// Compute the engraving area for the base image drawn at `base_bounds`.
    pub fn compute_area(&self, base_bounds: Rect, mode: MappingMode) -> IngotResult<SurfaceArea> {
        let coords = [base_bounds.x0, base_bounds.y0, base_bounds.x1, base_bounds.y1];
        if coords.iter().any(|v| !v.is_finite()) {
            return Err(IngotError::invalid_bounds("base bounds are not finite"));
        }
        let (w, h) = (base_bounds.width(), base_bounds.height());
        if w <= 0.0 || h <= 0.0 {
            return Err(IngotError::invalid_bounds(format!(
                "base bounds {w}x{h} have no area (image not loaded?)"
            )));
        }

        let at = |[fx, fy]: [f64; 2]| Point::new(base_bounds.x0 + w * fx, base_bounds.y0 + h * fy);
        Ok(match mode {
            MappingMode::Rect => {
                let r = self.ratios.rect;
                let origin = at([r.x, r.y]);
                SurfaceArea::Rect(Rect::from_origin_size(origin, (w * r.width, h * r.height)))
            }
            MappingMode::Perspective => {
                let q = self.ratios.quad;
                SurfaceArea::Quad(Quad {
                    top_left: at(q.top_left),
                    top_right: at(q.top_right),
                    bottom_left: at(q.bottom_left),
                    bottom_right: at(q.bottom_right),
                })
            }
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/mapper.rs"]
mod tests;
