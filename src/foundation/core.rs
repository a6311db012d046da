use crate::foundation::error::{IngotError, IngotResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Straight-alpha RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Build a color from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (leading `#` optional).
    pub fn from_hex(s: &str) -> IngotResult<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(IngotError::validation(format!(
                "color '{s}' must be #rrggbb"
            )));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| IngotError::validation(format!("color '{s}' has bad hex digits")))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Rec. 601 luma in `[0, 255]`.
    pub fn luma(self) -> f32 {
        crate::foundation::math::luma601(self.r, self.g, self.b)
    }
}

/// Dark gold used for the main engraved layer (`#5a4410`).
pub const ENGRAVING_COLOR: Rgb8 = Rgb8::new(0x5a, 0x44, 0x10);

/// Closed numeric interval used for caller-declared clamping bounds.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bound {
    /// Inclusive lower bound.
    pub min: f64,
    /// Inclusive upper bound.
    pub max: f64,
}

impl Bound {
    /// Create a validated bound with finite `min <= max`.
    pub fn new(min: f64, max: f64) -> IngotResult<Self> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(IngotError::validation(format!(
                "bound [{min}, {max}] must be finite with min <= max"
            )));
        }
        Ok(Self { min, max })
    }

    /// Clamp `v` into the bound; non-finite values map to `fallback` (itself clamped).
    pub fn clamp(self, v: f64, fallback: f64) -> f64 {
        let v = if v.is_finite() { v } else { fallback };
        v.clamp(self.min, self.max)
    }
}

/// Caller-declared ranges for user-adjustable placement values.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlacementBounds {
    /// Allowed uniform scale factor.
    pub scale: Bound,
    /// Allowed horizontal nudge in pixels.
    pub offset_x: Bound,
    /// Allowed vertical nudge in pixels.
    pub offset_y: Bound,
}

impl Default for PlacementBounds {
    fn default() -> Self {
        Self {
            scale: Bound { min: 0.5, max: 2.5 },
            offset_x: Bound {
                min: -40.0,
                max: 40.0,
            },
            offset_y: Bound {
                min: -20.0,
                max: 20.0,
            },
        }
    }
}

impl PlacementBounds {
    /// Check every bound is well formed and the scale range is positive.
    pub fn validate(&self) -> IngotResult<()> {
        for (name, b) in [
            ("scale", self.scale),
            ("offset_x", self.offset_x),
            ("offset_y", self.offset_y),
        ] {
            Bound::new(b.min, b.max)
                .map_err(|e| IngotError::validation(format!("placement {name}: {e}")))?;
        }
        if self.scale.min <= 0.0 {
            return Err(IngotError::validation("placement scale min must be > 0"));
        }
        Ok(())
    }
}

/// Immutable placement adjustments applied to engraving content about the area center.
///
/// Values are normalized on construction: rotation wraps into `[0, 360)`, scale and offsets are
/// clamped to [`PlacementBounds`], opacity to `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlacementSettings {
    rotation_degrees: f64,
    scale: f64,
    offset_x: f64,
    offset_y: f64,
    opacity: f64,
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            rotation_degrees: 0.0,
            scale: 1.0,
            offset_x: 0.0,
            offset_y: 0.0,
            opacity: 0.9,
        }
    }
}

impl PlacementSettings {
    /// Build normalized settings from raw (possibly out-of-range) inputs.
    pub fn new(
        rotation_degrees: f64,
        scale: f64,
        offset_x: f64,
        offset_y: f64,
        opacity: f64,
        bounds: &PlacementBounds,
    ) -> Self {
        let d = Self::default();
        Self {
            rotation_degrees: wrap_degrees(rotation_degrees),
            scale: bounds.scale.clamp(scale, d.scale),
            offset_x: bounds.offset_x.clamp(offset_x, d.offset_x),
            offset_y: bounds.offset_y.clamp(offset_y, d.offset_y),
            opacity: Bound { min: 0.0, max: 1.0 }.clamp(opacity, d.opacity),
        }
    }

    /// Re-apply normalization, e.g. after deserializing or tightening bounds.
    pub fn normalized(self, bounds: &PlacementBounds) -> Self {
        Self::new(
            self.rotation_degrees,
            self.scale,
            self.offset_x,
            self.offset_y,
            self.opacity,
            bounds,
        )
    }

    /// Rotation in degrees, always within `[0, 360)`.
    pub fn rotation_degrees(&self) -> f64 {
        self.rotation_degrees
    }

    /// Uniform scale factor.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Horizontal nudge in area-local pixels.
    pub fn offset_x(&self) -> f64 {
        self.offset_x
    }

    /// Vertical nudge in area-local pixels.
    pub fn offset_y(&self) -> f64 {
        self.offset_y
    }

    /// Content opacity in `[0, 1]`.
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// New settings rotated by `delta` degrees.
    pub fn rotate_by(self, delta: f64, bounds: &PlacementBounds) -> Self {
        Self {
            rotation_degrees: self.rotation_degrees + delta,
            ..self
        }
        .normalized(bounds)
    }

    /// New settings with `delta` added to the scale factor.
    pub fn scale_by(self, delta: f64, bounds: &PlacementBounds) -> Self {
        Self {
            scale: self.scale + delta,
            ..self
        }
        .normalized(bounds)
    }

    /// New settings nudged by `(dx, dy)` pixels.
    pub fn nudge(self, dx: f64, dy: f64, bounds: &PlacementBounds) -> Self {
        Self {
            offset_x: self.offset_x + dx,
            offset_y: self.offset_y + dy,
            ..self
        }
        .normalized(bounds)
    }

    /// New settings with a replaced opacity.
    pub fn with_opacity(self, opacity: f64, bounds: &PlacementBounds) -> Self {
        Self { opacity, ..self }.normalized(bounds)
    }

    /// Back to the default placement.
    pub fn reset(self) -> Self {
        Self::default()
    }

    /// Transform applied to content centered at the origin: scale, rotate, then translate to
    /// `center + offset`.
    pub fn content_transform(&self, center: Point) -> Affine {
        self.rigid_transform(center) * Affine::scale(self.scale)
    }

    /// Like [`Self::content_transform`] without the scale factor, for content that bakes the
    /// scale into its own size (text is laid out at the scaled font size).
    pub fn rigid_transform(&self, center: Point) -> Affine {
        Affine::translate(Vec2::new(center.x + self.offset_x, center.y + self.offset_y))
            * Affine::rotate(self.rotation_degrees.to_radians())
    }
}

fn wrap_degrees(v: f64) -> f64 {
    if !v.is_finite() {
        return 0.0;
    }
    let w = v.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if w >= 360.0 { 0.0 } else { w }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
