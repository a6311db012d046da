use crate::foundation::error::{IngotError, IngotResult};
use crate::foundation::math::mul_div255_u8;

pub type PremulRgba8 = [u8; 4];

/// Separable blend modes used by depth layers and surface effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Plain source-over.
    Normal,
    /// Darkens: `s * d`.
    Multiply,
    /// Lightens: `s + d - s * d`.
    Screen,
}

impl BlendMode {
    fn apply(self, s: f32, d: f32) -> f32 {
        match self {
            Self::Normal => s,
            Self::Multiply => s * d,
            Self::Screen => s + d - s * d,
        }
    }
}

pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> IngotResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(IngotError::validation(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Composite one premultiplied source pixel (channels in `[0, 1]`) onto `d` with `mode`.
///
/// Porter-Duff source-over with the blend applied to unpremultiplied channels:
/// `out_a = sa + da * (1 - sa)`, `out_p = sp * (1 - da) + dp * (1 - sa) + B(sc, dc) * sa * da`.
#[inline]
pub fn blend_px(d: &mut [u8], src: [f32; 4], mode: BlendMode) {
    let [sp_r, sp_g, sp_b, sa] = src;
    if sa <= 0.0 {
        return;
    }

    let dp = [
        f32::from(d[0]) / 255.0,
        f32::from(d[1]) / 255.0,
        f32::from(d[2]) / 255.0,
    ];
    let da = f32::from(d[3]) / 255.0;

    let inv_sa = 1.0 - sa;
    let out_a = (sa + da * inv_sa).clamp(0.0, 1.0);

    for (i, sp) in [sp_r, sp_g, sp_b].into_iter().enumerate() {
        let sc = (sp / sa).clamp(0.0, 1.0);
        let dc = if da > 0.0 {
            (dp[i] / da).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let b = mode.apply(sc, dc).clamp(0.0, 1.0);
        let out_p = (sp * (1.0 - da) + dp[i] * inv_sa + b * sa * da).clamp(0.0, 1.0);
        d[i] = (out_p * 255.0).round() as u8;
    }
    d[3] = (out_a * 255.0).round() as u8;
}

#[cfg(test)]
#[path = "../../tests/unit/render/blend.rs"]
mod tests;
