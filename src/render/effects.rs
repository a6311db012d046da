//! Surface-effect gradients applied in the engraving area's local frame.

use crate::{
    foundation::core::{Point, Rgb8, Vec2},
    foundation::math::px_index,
    render::blend::{BlendMode, blend_px},
    surface::mapper::SurfaceArea,
    surface::raster::RasterSurface,
};

/// Piecewise-linear alpha ramp over `t` in `[0, 1]`; stops must be sorted by position.
#[derive(Clone, Copy, Debug)]
pub struct AlphaRamp(pub &'static [(f32, f32)]);

impl AlphaRamp {
    /// Alpha at `t`, clamped to the first and last stop.
    pub fn at(&self, t: f32) -> f32 {
        let stops = self.0;
        let Some(&(first_t, first_a)) = stops.first() else {
            return 0.0;
        };
        if t <= first_t {
            return first_a;
        }
        for pair in stops.windows(2) {
            let ((t0, a0), (t1, a1)) = (pair[0], pair[1]);
            if t <= t1 {
                let span = t1 - t0;
                if span <= 0.0 {
                    return a1;
                }
                return a0 + (a1 - a0) * (t - t0) / span;
            }
        }
        stops.last().map_or(0.0, |&(_, a)| a)
    }
}

/// Soft dark center under text.
pub const DEPRESSION: AlphaRamp = AlphaRamp(&[(0.0, 0.2), (0.7, 0.1), (1.0, 0.0)]);
/// Diagonal darkening under logos.
pub const INTEGRATION: AlphaRamp = AlphaRamp(&[(0.0, 0.15), (0.5, 0.05), (1.0, 0.0)]);
/// White metallic reflection.
pub const REFLECTION: AlphaRamp = AlphaRamp(&[(0.0, 0.25), (0.5, 0.12), (1.0, 0.0)]);
/// Gold glint.
pub const GLINT: AlphaRamp = AlphaRamp(&[(0.0, 0.2), (1.0, 0.0)]);

const BLACK: Rgb8 = Rgb8::new(0, 0, 0);
const WHITE: Rgb8 = Rgb8::new(255, 255, 255);
const GOLD: Rgb8 = Rgb8::new(255, 215, 0);

/// Gradient geometry in area-local coordinates.
#[derive(Clone, Copy, Debug)]
enum Shape {
    /// Centered circle reaching `max(w, h) / 2`.
    Radial,
    /// From the local origin toward `(w, h) * extent`.
    Linear,
}

#[derive(Clone, Copy, Debug)]
struct GradientFill {
    shape: Shape,
    ramp: AlphaRamp,
    color: Rgb8,
    blend: BlendMode,
    /// Fraction of the area (from its top-left) that is filled.
    extent: (f64, f64),
}

/// Radial multiply that makes text look sunk into the surface.
pub fn engraving_depression(dst: &mut dyn RasterSurface, area: &SurfaceArea) {
    fill_gradient(
        dst,
        area,
        GradientFill {
            shape: Shape::Radial,
            ramp: DEPRESSION,
            color: BLACK,
            blend: BlendMode::Multiply,
            extent: (1.0, 1.0),
        },
    );
}

/// Linear multiply that blends a logo into the surface.
pub fn surface_integration(dst: &mut dyn RasterSurface, area: &SurfaceArea) {
    fill_gradient(
        dst,
        area,
        GradientFill {
            shape: Shape::Linear,
            ramp: INTEGRATION,
            color: BLACK,
            blend: BlendMode::Multiply,
            extent: (1.0, 1.0),
        },
    );
}

/// White reflection over the top-left 60% x 30% of the area, then a gold glint over 40% x 20%.
pub fn metallic_highlights(dst: &mut dyn RasterSurface, area: &SurfaceArea) {
    fill_gradient(
        dst,
        area,
        GradientFill {
            shape: Shape::Linear,
            ramp: REFLECTION,
            color: WHITE,
            blend: BlendMode::Screen,
            extent: (0.6, 0.3),
        },
    );
    fill_gradient(
        dst,
        area,
        GradientFill {
            shape: Shape::Linear,
            ramp: GLINT,
            color: GOLD,
            blend: BlendMode::Screen,
            extent: (0.4, 0.2),
        },
    );
}

fn fill_gradient(dst: &mut dyn RasterSurface, area: &SurfaceArea, fill: GradientFill) {
    let (aw, ah) = area.local_size();
    let (fw, fh) = (aw * fill.extent.0, ah * fill.extent.1);
    if fw <= 0.0 || fh <= 0.0 {
        return;
    }
    let to_local = area.local_to_canvas().inverse();
    let center = Point::new(aw / 2.0, ah / 2.0);
    let radius = aw.max(ah) / 2.0;
    let axis = Vec2::new(fw, fh);
    let axis_len2 = axis.hypot2();

    let (w, h) = (dst.width(), dst.height());
    let bb = area.bounding_rect();
    let x0 = bb.x0.floor().max(0.0) as u32;
    let y0 = bb.y0.floor().max(0.0) as u32;
    let x1 = (bb.x1.ceil().max(0.0) as u32).min(w);
    let y1 = (bb.y1.ceil().max(0.0) as u32).min(h);

    let [r, g, b] = [fill.color.r, fill.color.g, fill.color.b].map(|c| f32::from(c) / 255.0);
    let pixels = dst.pixels_mut();
    for y in y0..y1 {
        for x in x0..x1 {
            let p = to_local * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            if p.x < 0.0 || p.y < 0.0 || p.x >= fw || p.y >= fh {
                continue;
            }
            let t = match fill.shape {
                Shape::Radial => (p - center).hypot() / radius,
                Shape::Linear => p.to_vec2().dot(axis) / axis_len2,
            };
            let a = fill.ramp.at((t as f32).clamp(0.0, 1.0));
            if a <= 0.0 {
                continue;
            }
            let i = px_index(x, y, w);
            blend_px(&mut pixels[i..i + 4], [r * a, g * a, b * a, a], fill.blend);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/effects.rs"]
mod tests;
