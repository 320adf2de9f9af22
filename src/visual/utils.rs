// ============================================================================
// HSV COLOR SPACE - saturation/brightness filters and smooth color transitions
// ============================================================================

use bevy::math::{Vec3, Vec4};

use crate::visual::shinyness::StyleEffects;

/// Convert RGB to HSV (Hue, Saturation, Value), alpha dropped
pub fn rgb_to_hsv(color: Vec4) -> Vec3 {
    let r = color.x;
    let g = color.y;
    let b = color.z;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta < 0.00001 {
        0.0
    } else if (max - r).abs() < 0.00001 {
        ((g - b) / delta) % 6.0
    } else if (max - g).abs() < 0.00001 {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    let h = (h / 6.0).rem_euclid(1.0);

    let s = if max < 0.00001 { 0.0 } else { delta / max };

    Vec3::new(h, s, max)
}

/// Convert HSV back to RGB with the given alpha
pub fn hsv_to_rgb(hsv: Vec3, alpha: f32) -> Vec4 {
    let h = hsv.x * 6.0;
    let s = hsv.y;
    let v = hsv.z;

    let c = v * s;
    let x = c * (1.0 - ((h % 2.0) - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 1.0 {
        (c, x, 0.0)
    } else if h < 2.0 {
        (x, c, 0.0)
    } else if h < 3.0 {
        (0.0, c, x)
    } else if h < 4.0 {
        (0.0, x, c)
    } else if h < 5.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    Vec4::new(r + m, g + m, b + m, alpha)
}

/// Lerp two colors in HSV space (shortest path around the hue wheel), alpha linearly
pub fn lerp_hsv(color_a: Vec4, color_b: Vec4, t: f32) -> Vec4 {
    let hsv_a = rgb_to_hsv(color_a);
    let hsv_b = rgb_to_hsv(color_b);

    let mut hue_a = hsv_a.x;
    let mut hue_b = hsv_b.x;

    // If hues are more than 180° apart, wrap around
    if (hue_b - hue_a).abs() > 0.5 {
        if hue_a < hue_b {
            hue_a += 1.0;
        } else {
            hue_b += 1.0;
        }
    }

    let mixed_hue = (hue_a + (hue_b - hue_a) * t).rem_euclid(1.0);
    let mixed_sat = hsv_a.y + (hsv_b.y - hsv_a.y) * t;
    let mixed_val = hsv_a.z + (hsv_b.z - hsv_a.z) * t;
    let mixed_alpha = color_a.w + (color_b.w - color_a.w) * t;

    hsv_to_rgb(Vec3::new(mixed_hue, mixed_sat, mixed_val), mixed_alpha)
}

/// Apply a style's saturate/brightness filter and opacity to a base color
pub fn filtered_color(base: Vec4, style: &StyleEffects) -> Vec4 {
    let hsv = rgb_to_hsv(base);
    let filtered = Vec3::new(
        hsv.x,
        (hsv.y * style.filter.saturation).clamp(0.0, 1.0),
        (hsv.z * style.filter.brightness).clamp(0.0, 1.0),
    );

    hsv_to_rgb(filtered, (base.w * style.opacity).clamp(0.0, 1.0))
}
