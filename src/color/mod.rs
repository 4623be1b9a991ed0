use image::{Rgb, RgbImage};

/// Full-range HSV color: hue spans the whole 0-255 byte (360 degrees maps
/// onto 256 steps), unlike the half-range variant where hue tops out at 179.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub const fn new(h: u8, s: u8, v: u8) -> Self {
        Self { h, s, v }
    }
}

/// Per-channel radius applied around a picked color when deriving an
/// acceptance range: generous on hue, stricter on saturation and value.
pub const COLOR_RADIUS: Hsv = Hsv::new(25, 50, 50);

/// Inclusive acceptance interval in HSV space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HsvRange {
    pub lower: Hsv,
    pub upper: Hsv,
}

impl HsvRange {
    /// Build the interval `reference ± radius`, clamped to [0, 255] on every
    /// channel via saturating arithmetic.
    pub fn around(reference: Hsv, radius: Hsv) -> Self {
        Self {
            lower: Hsv::new(
                reference.h.saturating_sub(radius.h),
                reference.s.saturating_sub(radius.s),
                reference.v.saturating_sub(radius.v),
            ),
            upper: Hsv::new(
                reference.h.saturating_add(radius.h),
                reference.s.saturating_add(radius.s),
                reference.v.saturating_add(radius.v),
            ),
        }
    }

    /// Inclusive on both bounds, per-channel AND.
    pub fn contains(&self, color: Hsv) -> bool {
        color.h >= self.lower.h
            && color.h <= self.upper.h
            && color.s >= self.lower.s
            && color.s <= self.upper.s
            && color.v >= self.lower.v
            && color.v <= self.upper.v
    }
}

/// Convert an RGB triple to full-range HSV bytes.
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> Hsv {
    let r = r as f32 / 255.0;
    let g = g as f32 / 255.0;
    let b = b as f32 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let h = if delta == 0.0 {
        0.0
    } else if max == r {
        60.0 * (((g - b) / delta) % 6.0)
    } else if max == g {
        60.0 * (((b - r) / delta) + 2.0)
    } else {
        60.0 * (((r - g) / delta) + 4.0)
    };
    let h = if h < 0.0 { h + 360.0 } else { h };

    let s = if max == 0.0 { 0.0 } else { delta / max };

    Hsv::new(
        (h * 255.0 / 360.0).round() as u8,
        (s * 255.0).round() as u8,
        (max * 255.0).round() as u8,
    )
}

/// Convert full-range HSV back to an RGB triple, for preview rendering.
pub fn hsv_to_rgb(color: Hsv) -> (u8, u8, u8) {
    let h = color.h as f32 * 360.0 / 255.0;
    let s = color.s as f32 / 255.0;
    let v = color.v as f32 / 255.0;

    let c = v * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (
        ((r + m) * 255.0).round() as u8,
        ((g + m) * 255.0).round() as u8,
        ((b + m) * 255.0).round() as u8,
    )
}

/// Render the accepted hues as a 1-row RGB strip, one pixel per hue step at
/// full saturation and value. Width is `upper.h - lower.h`; a zero-width
/// strip is degenerate but legal.
pub fn spectrum(range: &HsvRange) -> RgbImage {
    let width = range.upper.h.saturating_sub(range.lower.h) as u32;
    RgbImage::from_fn(width, 1, |x, _| {
        let (r, g, b) = hsv_to_rgb(Hsv::new(range.lower.h + x as u8, 255, 255));
        Rgb([r, g, b])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_is_symmetric_away_from_extremes() {
        let range = HsvRange::around(Hsv::new(100, 120, 130), COLOR_RADIUS);
        assert_eq!(range.lower, Hsv::new(75, 70, 80));
        assert_eq!(range.upper, Hsv::new(125, 170, 180));
    }

    #[test]
    fn range_clamps_at_channel_extremes() {
        let low = HsvRange::around(Hsv::new(10, 30, 40), COLOR_RADIUS);
        assert_eq!(low.lower, Hsv::new(0, 0, 0));
        assert_eq!(low.upper, Hsv::new(35, 80, 90));

        let high = HsvRange::around(Hsv::new(240, 230, 220), COLOR_RADIUS);
        assert_eq!(high.lower, Hsv::new(215, 180, 170));
        assert_eq!(high.upper, Hsv::new(255, 255, 255));
    }

    #[test]
    fn contains_is_inclusive_on_both_bounds() {
        let range = HsvRange::around(Hsv::new(100, 100, 100), COLOR_RADIUS);
        assert!(range.contains(range.lower));
        assert!(range.contains(range.upper));
        assert!(!range.contains(Hsv::new(range.lower.h - 1, 100, 100)));
        assert!(!range.contains(Hsv::new(range.upper.h + 1, 100, 100)));
    }

    #[test]
    fn widening_a_bound_never_drops_a_pixel_sitting_on_it() {
        // Inclusive-bound monotonicity: a color exactly at a bound stays in
        // range when that bound moves outward by one.
        let range = HsvRange::around(Hsv::new(100, 100, 100), COLOR_RADIUS);
        let at_upper = range.upper;
        let widened = HsvRange {
            lower: range.lower,
            upper: Hsv::new(range.upper.h + 1, range.upper.s + 1, range.upper.v + 1),
        };
        assert!(range.contains(at_upper));
        assert!(widened.contains(at_upper));
    }

    #[test]
    fn spectrum_width_follows_the_clamped_hue_interval() {
        for h in [0u8, 10, 25, 100, 230, 245, 255] {
            let range = HsvRange::around(Hsv::new(h, 128, 128), COLOR_RADIUS);
            let expected = 255.min(h as i32 + 25) - 0.max(h as i32 - 25);
            assert_eq!(spectrum(&range).width(), expected as u32, "hue {h}");
        }
    }

    #[test]
    fn spectrum_pixels_are_fully_saturated_hues() {
        let range = HsvRange::around(Hsv::new(100, 128, 128), COLOR_RADIUS);
        let strip = spectrum(&range);
        assert_eq!(strip.dimensions(), (50, 1));
        let first = strip.get_pixel(0, 0);
        let (r, g, b) = hsv_to_rgb(Hsv::new(75, 255, 255));
        assert_eq!(first.0, [r, g, b]);
    }

    #[test]
    fn rgb_to_hsv_known_colors() {
        assert_eq!(rgb_to_hsv(255, 0, 0), Hsv::new(0, 255, 255));
        // 120 degrees scales to 85 in the full-range encoding
        assert_eq!(rgb_to_hsv(0, 255, 0), Hsv::new(85, 255, 255));
        assert_eq!(rgb_to_hsv(0, 0, 255), Hsv::new(170, 255, 255));
        // Grays have no saturation
        assert_eq!(rgb_to_hsv(128, 128, 128), Hsv::new(0, 0, 128));
        assert_eq!(rgb_to_hsv(0, 0, 0), Hsv::new(0, 0, 0));
    }

    #[test]
    fn hsv_to_rgb_inverts_primaries() {
        assert_eq!(hsv_to_rgb(Hsv::new(0, 255, 255)), (255, 0, 0));
        assert_eq!(hsv_to_rgb(Hsv::new(85, 255, 255)), (0, 255, 0));
        assert_eq!(hsv_to_rgb(Hsv::new(170, 255, 255)), (0, 0, 255));
    }
}
