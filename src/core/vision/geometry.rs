//! 轮廓几何：面积、周长、多边形逼近、凸包、外接矩形
//!
//! 面积统一按像素计：由 Pick 定理 `A + B/2 + 1` 把以像素中心为顶点的多边形
//! 换算成其覆盖的像素数，因此一个实心 w×h 方块的面积正好是 w·h，
//! 与宽高窗口在边界上保持一致。

use super::frame::BoundingBox;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

fn cross(o: Point, a: Point, b: Point) -> i64 {
    (a.x - o.x) as i64 * (b.y - o.y) as i64 - (a.y - o.y) as i64 * (b.x - o.x) as i64
}

fn distance(a: Point, b: Point) -> f64 {
    let dx = (a.x - b.x) as f64;
    let dy = (a.y - b.y) as f64;
    (dx * dx + dy * dy).sqrt()
}

fn gcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a.abs()
}

/// Distance from `p` to the infinite line through `a` and `b`.
fn line_distance(p: Point, a: Point, b: Point) -> f64 {
    let len = distance(a, b);
    if len == 0.0 {
        return distance(p, a);
    }
    cross(a, b, p).abs() as f64 / len
}

/// Absolute shoelace area of the closed polygon through `points`.
pub fn polygon_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice = 0i64;
    for (i, &p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        twice += p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64;
    }
    (twice as f64 / 2.0).abs()
}

/// Number of lattice points on the closed polygon's edges.
fn boundary_lattice_points(points: &[Point]) -> i64 {
    if points.len() < 2 {
        return 0;
    }
    let mut count = 0;
    for (i, &p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        count += gcd((q.x - p.x) as i64, (q.y - p.y) as i64);
    }
    count
}

/// 多边形覆盖的像素数（边界上的像素也计入）
pub fn pixel_area(points: &[Point]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    polygon_area(points) + boundary_lattice_points(points) as f64 / 2.0 + 1.0
}

/// Perimeter of the closed curve.
pub fn arc_length(points: &[Point]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    points
        .iter()
        .enumerate()
        .map(|(i, &p)| distance(p, points[(i + 1) % points.len()]))
        .sum()
}

pub fn bounding_rect(points: &[Point]) -> Option<BoundingBox> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some(BoundingBox::new(
        min_x,
        min_y,
        (max_x - min_x + 1) as u32,
        (max_y - min_y + 1) as u32,
    ))
}

/// Andrew monotone chain; collinear points are dropped.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut pts = points.to_vec();
    pts.sort_unstable();
    pts.dedup();
    if pts.len() < 3 {
        return pts;
    }

    let mut hull: Vec<Point> = Vec::with_capacity(pts.len() * 2);
    for &p in &pts {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0 {
            hull.pop();
        }
        hull.push(p);
    }
    let lower_len = hull.len() + 1;
    for &p in pts.iter().rev().skip(1) {
        while hull.len() >= lower_len && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0 {
            hull.pop();
        }
        hull.push(p);
    }
    hull.pop();
    hull
}

/// 实度 = 轮廓面积 / 凸包面积；凸包退化（几何面积为 0）时记为 0
pub fn solidity(contour: &[Point]) -> f64 {
    let hull = convex_hull(contour);
    if polygon_area(&hull) <= 0.0 {
        return 0.0;
    }
    pixel_area(contour) / pixel_area(&hull)
}

/// Douglas–Peucker simplification of an open polyline, keeping both ends.
fn simplify_open(points: &[Point], epsilon: f64) -> Vec<Point> {
    let last = points.len() - 1;
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[last] = true;

    let mut stack = vec![(0usize, last)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }
        let (a, b) = (points[start], points[end]);
        let mut max_dist = 0.0;
        let mut max_idx = start;
        for (k, &p) in points.iter().enumerate().take(end).skip(start + 1) {
            let d = line_distance(p, a, b);
            if d > max_dist {
                max_dist = d;
                max_idx = k;
            }
        }
        if max_dist > epsilon {
            keep[max_idx] = true;
            stack.push((start, max_idx));
            stack.push((max_idx, end));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(&p, k)| k.then_some(p))
        .collect()
}

fn farthest_from(points: &[Point], from: usize) -> usize {
    let origin = points[from];
    let mut best = from;
    let mut best_dist = 0.0;
    for (i, &p) in points.iter().enumerate() {
        let d = distance(origin, p);
        if d > best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

/// 闭合曲线的多边形逼近
///
/// 先取相距最远的两点把曲线切成两段，各段分别做 Douglas–Peucker，
/// 最后再剔除与相邻两顶点连线距离不超过 `epsilon` 的顶点。
pub fn approx_poly_dp(contour: &[Point], epsilon: f64) -> Vec<Point> {
    let n = contour.len();
    if n <= 2 {
        return contour.to_vec();
    }

    let a = farthest_from(contour, 0);
    let b = farthest_from(contour, a);
    if a == b {
        return vec![contour[a]];
    }

    let chain = |from: usize, to: usize| -> Vec<Point> {
        let len = (to + n - from) % n + 1;
        (0..len).map(|i| contour[(from + i) % n]).collect()
    };

    let mut poly = simplify_open(&chain(a, b), epsilon);
    poly.pop();
    let mut second = simplify_open(&chain(b, a), epsilon);
    second.pop();
    poly.extend(second);

    let mut changed = true;
    while changed && poly.len() > 3 {
        changed = false;
        for i in 0..poly.len() {
            let prev = poly[(i + poly.len() - 1) % poly.len()];
            let next = poly[(i + 1) % poly.len()];
            if line_distance(poly[i], prev, next) <= epsilon {
                poly.remove(i);
                changed = true;
                break;
            }
        }
    }
    poly
}
