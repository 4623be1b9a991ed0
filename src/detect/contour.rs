use super::mask::FOREGROUND;
use image::GrayImage;

/// Fraction of the largest contour area a contour must strictly exceed to be
/// considered significant.
pub const MIN_CONTOUR_AREA: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// Closed outer boundary of one connected mask region, as the compressed
/// vertex list (straight and diagonal runs keep only their endpoints).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    pub points: Vec<Point>,
}

impl Contour {
    /// Enclosed planar area by the shoelace formula. Single- and two-point
    /// boundaries have zero area.
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut twice_area = 0i64;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            twice_area += a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64;
        }
        (twice_area.abs() as f64) / 2.0
    }
}

// Moore neighborhood in clockwise order (y grows downward).
const DX: [i32; 8] = [1, 1, 0, -1, -1, -1, 0, 1];
const DY: [i32; 8] = [0, 1, 1, 1, 0, -1, -1, -1];

fn is_fg(mask: &GrayImage, x: i32, y: i32) -> bool {
    x >= 0
        && y >= 0
        && (x as u32) < mask.width()
        && (y as u32) < mask.height()
        && mask.get_pixel(x as u32, y as u32)[0] == FOREGROUND
}

/// Find the outer boundary of every 8-connected foreground region. Hole
/// boundaries are not reported; only external topology matters downstream.
pub fn find_external(mask: &GrayImage) -> Vec<Contour> {
    let (w, h) = mask.dimensions();
    let mut component = vec![false; (w * h) as usize];
    let mut contours = Vec::new();

    // Row-major scan, so the first unvisited pixel of a region is its
    // topmost-leftmost pixel: a valid boundary-trace anchor with a
    // guaranteed background pixel to its west.
    for y in 0..h as i32 {
        for x in 0..w as i32 {
            if !is_fg(mask, x, y) || component[(y as u32 * w + x as u32) as usize] {
                continue;
            }
            flood_component(mask, &mut component, Point { x, y });
            let boundary = trace_boundary(mask, Point { x, y });
            contours.push(Contour {
                points: compress(&boundary),
            });
        }
    }
    contours
}

/// Mark all pixels 8-connected to `seed` as belonging to an already-traced
/// component.
fn flood_component(mask: &GrayImage, component: &mut [bool], seed: Point) {
    let w = mask.width();
    let mut stack = vec![seed];
    component[(seed.y as u32 * w + seed.x as u32) as usize] = true;
    while let Some(p) = stack.pop() {
        for d in 0..8 {
            let nx = p.x + DX[d];
            let ny = p.y + DY[d];
            if is_fg(mask, nx, ny) {
                let idx = (ny as u32 * w + nx as u32) as usize;
                if !component[idx] {
                    component[idx] = true;
                    stack.push(Point { x: nx, y: ny });
                }
            }
        }
    }
}

/// Clockwise Moore-neighbor boundary trace starting from the region's
/// topmost-leftmost pixel, terminating when the starting move repeats.
fn trace_boundary(mask: &GrayImage, start: Point) -> Vec<Point> {
    let mut boundary = Vec::new();
    let mut cur = start;
    // The anchor was entered "from the west": that neighbor is background.
    let mut backtrack_dir = 4usize;
    let mut first_move: Option<(Point, Point)> = None;

    loop {
        // Clockwise sweep beginning just past the backtrack neighbor.
        let mut next = None;
        for i in 1..=8 {
            let d = (backtrack_dir + i) % 8;
            let nx = cur.x + DX[d];
            let ny = cur.y + DY[d];
            if is_fg(mask, nx, ny) {
                next = Some((d, Point { x: nx, y: ny }));
                break;
            }
        }
        let Some((d, next)) = next else {
            // Isolated pixel.
            boundary.push(cur);
            break;
        };
        match first_move {
            None => first_move = Some((cur, next)),
            Some((anchor, anchor_next)) if cur == anchor && next == anchor_next => break,
            Some(_) => {}
        }
        boundary.push(cur);
        backtrack_dir = (d + 4) % 8;
        cur = next;
    }
    boundary
}

/// Collapse runs of constant direction so only direction-change vertices
/// remain, the usual compressed chain representation.
fn compress(boundary: &[Point]) -> Vec<Point> {
    let n = boundary.len();
    if n <= 2 {
        return boundary.to_vec();
    }
    let dir = |a: Point, b: Point| ((b.x - a.x).signum(), (b.y - a.y).signum());
    let mut out = Vec::new();
    for i in 0..n {
        let prev = boundary[(i + n - 1) % n];
        let cur = boundary[i];
        let next = boundary[(i + 1) % n];
        if dir(prev, cur) != dir(cur, next) {
            out.push(cur);
        }
    }
    if out.is_empty() {
        // Entire boundary ran in one direction; keep the endpoints.
        out.push(boundary[0]);
        out.push(boundary[n - 1]);
    }
    out
}

/// Sort contours by descending area and keep those strictly above
/// `MIN_CONTOUR_AREA` times the largest area.
pub fn filter_significant(contours: Vec<Contour>) -> Vec<Contour> {
    let mut ranked: Vec<(f64, Contour)> =
        contours.into_iter().map(|c| (c.area(), c)).collect();
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    let Some(&(max_area, _)) = ranked.first() else {
        return Vec::new();
    };
    ranked
        .into_iter()
        .take_while(|(area, _)| *area > MIN_CONTOUR_AREA * max_area)
        .map(|(_, c)| c)
        .collect()
}
