use super::UnitRgb;

/// Convert hue, saturation and lightness (all `0.0..=1.0`) to RGB
///
/// Hue wraps around the circle, so values slightly outside of the unit
/// range still land on the expected sector.
pub fn hsb_to_rgb(hue: f32, saturation: f32, lightness: f32) -> UnitRgb {
    if saturation == 0.0 {
        return UnitRgb {
            r: lightness,
            g: lightness,
            b: lightness,
        };
    }

    let q = if lightness < 0.5 {
        lightness * (1.0 + saturation)
    } else {
        lightness + saturation - lightness * saturation
    };
    let p = 2.0 * lightness - q;

    UnitRgb {
        r: hue_to_channel(p, q, hue + 1.0 / 3.0),
        g: hue_to_channel(p, q, hue),
        b: hue_to_channel(p, q, hue - 1.0 / 3.0),
    }
}

fn hue_to_channel(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    } else if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}
