/// Rec. 709 luma weights, applied to straight (non-premultiplied) color.
pub(crate) const LUMA_R: f32 = 0.2126;
pub(crate) const LUMA_G: f32 = 0.7152;
pub(crate) const LUMA_B: f32 = 0.0722;

/// `[0,1] -> [0,255]` with rounding. Out-of-range values clamp; NaN maps to 0.
pub(crate) fn quantize_unit_u8(v: f32) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

pub(crate) fn unpremultiply(px: [f32; 4]) -> [f32; 4] {
    let a = px[3];
    if a == 0.0 {
        return [0.0, 0.0, 0.0, 0.0];
    }
    [px[0] / a, px[1] / a, px[2] / a, a]
}

pub(crate) fn premultiply(px: [f32; 4]) -> [f32; 4] {
    let a = px[3];
    [px[0] * a, px[1] * a, px[2] * a, a]
}

pub(crate) fn luminance(straight: [f32; 4]) -> f32 {
    LUMA_R * straight[0] + LUMA_G * straight[1] + LUMA_B * straight[2]
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
