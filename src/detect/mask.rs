use crate::color::{rgb_to_hsv, HsvRange};
use image::{GrayImage, Luma, RgbaImage};

pub const FOREGROUND: u8 = 255;

fn ensure_size(buf: &mut GrayImage, w: u32, h: u32) {
    if buf.dimensions() != (w, h) {
        *buf = GrayImage::new(w, h);
    }
}

/// Convert each frame pixel to HSV and mark it as foreground when it falls
/// inside the acceptance range. The mask buffer is resized to the frame
/// dimensions and fully overwritten; alpha is ignored.
pub fn threshold(frame: &RgbaImage, range: &HsvRange, mask: &mut GrayImage) {
    let (w, h) = frame.dimensions();
    ensure_size(mask, w, h);
    for (x, y, px) in frame.enumerate_pixels() {
        let hsv = rgb_to_hsv(px[0], px[1], px[2]);
        let value = if range.contains(hsv) { FOREGROUND } else { 0 };
        mask.put_pixel(x, y, Luma([value]));
    }
}

/// One dilation pass with a 3x3 square structuring element. Pixels outside
/// the image count as background.
pub fn dilate(src: &GrayImage, dst: &mut GrayImage) {
    let (w, h) = src.dimensions();
    ensure_size(dst, w, h);
    for y in 0..h {
        for x in 0..w {
            let mut value = 0;
            'scan: for dy in -1i64..=1 {
                for dx in -1i64..=1 {
                    let nx = x as i64 + dx;
                    let ny = y as i64 + dy;
                    if nx < 0 || nx >= w as i64 || ny < 0 || ny >= h as i64 {
                        continue;
                    }
                    if src.get_pixel(nx as u32, ny as u32)[0] == FOREGROUND {
                        value = FOREGROUND;
                        break 'scan;
                    }
                }
            }
            dst.put_pixel(x, y, Luma([value]));
        }
    }
}
