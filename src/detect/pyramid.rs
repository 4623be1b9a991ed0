use image::{Rgba, RgbaImage};

// Separable 5-tap binomial kernel; the 2D weights sum to 256.
const TAPS: [u32; 5] = [1, 4, 6, 4, 1];

/// Reflect-101 border indexing (-1 maps to 1, len maps to len-2), clamped so
/// degenerate 1- or 2-pixel axes stay in bounds.
fn reflect(i: i64, len: u32) -> usize {
    let last = len as i64 - 1;
    let i = if i < 0 {
        -i
    } else if i > last {
        2 * last - i
    } else {
        i
    };
    i.clamp(0, last) as usize
}

/// One pyramid level: binomial smoothing followed by keeping every other row
/// and column. Output dimensions are `ceil(w/2) x ceil(h/2)`. The destination
/// buffer is resized as needed and fully overwritten.
pub fn pyr_down(src: &RgbaImage, dst: &mut RgbaImage) {
    let (w, h) = src.dimensions();
    let dw = w.div_ceil(2);
    let dh = h.div_ceil(2);
    if dst.dimensions() != (dw, dh) {
        *dst = RgbaImage::new(dw, dh);
    }

    // Horizontal pass, sampled at even source columns only. Sums stay
    // unnormalized (max 255 * 16) until the vertical pass.
    let mut rows: Vec<[u32; 4]> = vec![[0; 4]; (dw * h) as usize];
    for y in 0..h {
        for dx in 0..dw {
            let sx = 2 * dx as i64;
            let mut acc = [0u32; 4];
            for (k, tap) in TAPS.iter().enumerate() {
                let px = src.get_pixel(reflect(sx + k as i64 - 2, w) as u32, y);
                for c in 0..4 {
                    acc[c] += tap * px[c] as u32;
                }
            }
            rows[(y * dw + dx) as usize] = acc;
        }
    }

    // Vertical pass at even source rows, with a single rounding division.
    for dy in 0..dh {
        let sy = 2 * dy as i64;
        for dx in 0..dw {
            let mut acc = [0u32; 4];
            for (k, tap) in TAPS.iter().enumerate() {
                let row = reflect(sy + k as i64 - 2, h) as u32;
                let sum = rows[(row * dw + dx) as usize];
                for c in 0..4 {
                    acc[c] += tap * sum[c];
                }
            }
            let px = Rgba([
                ((acc[0] + 128) >> 8) as u8,
                ((acc[1] + 128) >> 8) as u8,
                ((acc[2] + 128) >> 8) as u8,
                ((acc[3] + 128) >> 8) as u8,
            ]);
            dst.put_pixel(dx, dy, px);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32, rgba: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(rgba))
    }

    #[test]
    fn halves_dimensions_rounding_up() {
        let mut dst = RgbaImage::new(0, 0);
        pyr_down(&solid(80, 60, [0; 4]), &mut dst);
        assert_eq!(dst.dimensions(), (40, 30));
        pyr_down(&solid(81, 61, [0; 4]), &mut dst);
        assert_eq!(dst.dimensions(), (41, 31));
    }

    #[test]
    fn uniform_image_stays_uniform() {
        let mut dst = RgbaImage::new(0, 0);
        pyr_down(&solid(32, 32, [200, 100, 50, 255]), &mut dst);
        for px in dst.pixels() {
            assert_eq!(px.0, [200, 100, 50, 255]);
        }
    }

    #[test]
    fn interior_of_a_large_region_survives_smoothing() {
        // Left half white, right half black; far from the seam the output
        // must be pure white or pure black.
        let src = RgbaImage::from_fn(64, 64, |x, _| {
            if x < 32 {
                Rgba([255, 255, 255, 255])
            } else {
                Rgba([0, 0, 0, 255])
            }
        });
        let mut dst = RgbaImage::new(0, 0);
        pyr_down(&src, &mut dst);
        assert_eq!(dst.dimensions(), (32, 32));
        assert_eq!(dst.get_pixel(4, 16).0[0], 255);
        assert_eq!(dst.get_pixel(28, 16).0[0], 0);
    }

    #[test]
    fn reflect_handles_borders() {
        assert_eq!(reflect(-1, 10), 1);
        assert_eq!(reflect(-2, 10), 2);
        assert_eq!(reflect(0, 10), 0);
        assert_eq!(reflect(9, 10), 9);
        assert_eq!(reflect(10, 10), 8);
        assert_eq!(reflect(11, 10), 7);
    }

    #[test]
    fn reuses_destination_buffer_without_stale_state() {
        let mut dst = RgbaImage::new(0, 0);
        pyr_down(&solid(16, 16, [255, 0, 0, 255]), &mut dst);
        pyr_down(&solid(16, 16, [0, 255, 0, 255]), &mut dst);
        for px in dst.pixels() {
            assert_eq!(px.0, [0, 255, 0, 255]);
        }
    }
}
