use super::contour::Point;

/// Cross product of OA x OB; positive when O-A-B turns counter-clockwise in
/// a y-up frame.
fn cross(o: Point, a: Point, b: Point) -> i64 {
    (a.x - o.x) as i64 * (b.y - o.y) as i64 - (a.y - o.y) as i64 * (b.x - o.x) as i64
}

/// Andrew monotone chain convex hull. Vertices come back in a consistent
/// winding with collinear points dropped; inputs of fewer than three points
/// are returned as-is.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| (a.x, a.y).cmp(&(b.x, b.y)));
    sorted.dedup();
    if sorted.len() < 3 {
        return sorted;
    }

    let mut hull: Vec<Point> = Vec::with_capacity(sorted.len() + 1);
    // Lower chain.
    for &p in &sorted {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0 {
            hull.pop();
        }
        hull.push(p);
    }
    // Upper chain.
    let lower_len = hull.len() + 1;
    for &p in sorted.iter().rev().skip(1) {
        while hull.len() >= lower_len && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0 {
            hull.pop();
        }
        hull.push(p);
    }
    hull.pop();
    hull
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: i32, y: i32) -> Point {
        Point { x, y }
    }

    /// Convexity check: the cross product between consecutive edges never
    /// changes sign.
    fn is_convex(hull: &[Point]) -> bool {
        let n = hull.len();
        if n < 3 {
            return true;
        }
        let mut sign = 0i64;
        for i in 0..n {
            let c = cross(hull[i], hull[(i + 1) % n], hull[(i + 2) % n]);
            if c != 0 {
                if sign != 0 && c.signum() != sign {
                    return false;
                }
                sign = c.signum();
            }
        }
        true
    }

    #[test]
    fn square_with_interior_points_reduces_to_corners() {
        let pts = vec![
            p(0, 0),
            p(10, 0),
            p(10, 10),
            p(0, 10),
            p(5, 5),
            p(3, 7),
            p(9, 1),
        ];
        let hull = convex_hull(&pts);
        assert_eq!(hull.len(), 4);
        for corner in [p(0, 0), p(10, 0), p(10, 10), p(0, 10)] {
            assert!(hull.contains(&corner));
        }
        assert!(is_convex(&hull));
    }

    #[test]
    fn collinear_edge_points_are_dropped() {
        let pts = vec![p(0, 0), p(5, 0), p(10, 0), p(10, 10), p(0, 10)];
        let hull = convex_hull(&pts);
        assert_eq!(hull.len(), 4);
        assert!(!hull.contains(&p(5, 0)));
    }

    #[test]
    fn degenerate_inputs_pass_through() {
        assert!(convex_hull(&[]).is_empty());
        assert_eq!(convex_hull(&[p(3, 4)]), vec![p(3, 4)]);
        assert_eq!(convex_hull(&[p(0, 0), p(2, 2)]), vec![p(0, 0), p(2, 2)]);
        // Fully collinear input collapses to the two extremes.
        let line = convex_hull(&[p(0, 0), p(1, 1), p(2, 2), p(3, 3)]);
        assert_eq!(line, vec![p(0, 0), p(3, 3)]);
    }

    #[test]
    fn hull_of_random_cross_shape_is_convex() {
        let pts = vec![
            p(5, 0),
            p(6, 4),
            p(10, 5),
            p(6, 6),
            p(5, 10),
            p(4, 6),
            p(0, 5),
            p(4, 4),
        ];
        let hull = convex_hull(&pts);
        assert!(is_convex(&hull));
        assert_eq!(hull.len(), 4);
    }
}
