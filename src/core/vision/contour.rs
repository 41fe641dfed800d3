//! 外轮廓提取（Suzuki–Abe 边界跟踪）
//!
//! 前景按 8 连通处理。只保留父边界为图像外框的外边界，即最外层轮廓；
//! 轮廓点做水平/垂直/对角线段压缩，只留下线段端点。

use super::frame::Mask;
use super::geometry::Point;

/// Clockwise neighbourhood in image coordinates (y grows downward), starting east.
const NEIGHBOURS: [(i32, i32); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

#[derive(Debug, Clone, Copy)]
struct Border {
    is_hole: bool,
    parent: usize,
}

/// Label grid with a one pixel zero frame around the mask.
struct LabelGrid {
    width: i32,
    cells: Vec<i32>,
}

impl LabelGrid {
    fn from_mask(mask: &Mask) -> Self {
        let width = mask.width() as i32 + 2;
        let height = mask.height() as i32 + 2;
        let mut cells = vec![0i32; width as usize * height as usize];
        for y in 0..mask.height() {
            for x in 0..mask.width() {
                if mask.is_foreground(x, y) {
                    cells[((y as i32 + 1) * width + x as i32 + 1) as usize] = 1;
                }
            }
        }
        Self { width, cells }
    }

    #[inline]
    fn get(&self, p: Point) -> i32 {
        self.cells[(p.y * self.width + p.x) as usize]
    }

    #[inline]
    fn set(&mut self, p: Point, value: i32) {
        self.cells[(p.y * self.width + p.x) as usize] = value;
    }
}

fn direction_of(center: Point, neighbour: Point) -> usize {
    let d = (neighbour.x - center.x, neighbour.y - center.y);
    NEIGHBOURS.iter().position(|&n| n == d).unwrap_or(0)
}

fn step(p: Point, dir: usize) -> Point {
    let (dx, dy) = NEIGHBOURS[dir % 8];
    Point::new(p.x + dx, p.y + dy)
}

/// Follows one border starting at `start`, `from` being the zero pixel that
/// triggered it. Marks the label grid with `nbd` as it goes.
fn follow_border(grid: &mut LabelGrid, start: Point, from: Point, nbd: i32) -> Vec<Point> {
    // 3.1 顺时针寻找第一个非零邻点
    let from_dir = direction_of(start, from);
    let first = (0..8)
        .map(|k| step(start, from_dir + k))
        .find(|&p| grid.get(p) != 0);

    let Some(first) = first else {
        // 孤立点
        grid.set(start, -nbd);
        return vec![start];
    };

    let mut points = vec![start];
    let mut prev = first;
    let mut current = start;

    loop {
        // 3.3 从 prev 的下一个位置开始逆时针搜索
        let prev_dir = direction_of(current, prev);
        let mut east_is_zero = false;
        let mut next = prev;
        for k in 1..=8 {
            let dir = (prev_dir + 8 - k) % 8;
            let candidate = step(current, dir);
            if grid.get(candidate) != 0 {
                next = candidate;
                break;
            }
            if dir == 0 {
                east_is_zero = true;
            }
        }

        // 3.4
        if east_is_zero {
            grid.set(current, -nbd);
        } else if grid.get(current) == 1 {
            grid.set(current, nbd);
        }

        // 3.5
        if next == start && current == first {
            break;
        }
        points.push(next);
        prev = current;
        current = next;
    }

    points
}

/// Drops border points that sit in the middle of a straight run.
fn compress_runs(points: Vec<Point>) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points;
    }
    let dir = |a: Point, b: Point| (b.x - a.x, b.y - a.y);

    let mut compressed = Vec::with_capacity(n);
    compressed.push(points[0]);
    for i in 1..n {
        let prev = points[i - 1];
        let next = points[(i + 1) % n];
        if dir(prev, points[i]) != dir(points[i], next) {
            compressed.push(points[i]);
        }
    }
    compressed
}

/// 找出掩码中所有最外层轮廓，按外边界起点的光栅扫描顺序返回（掩码坐标）
pub fn find_external_contours(mask: &Mask) -> Vec<Vec<Point>> {
    let mut grid = LabelGrid::from_mask(mask);
    let width = mask.width() as i32 + 2;
    let height = mask.height() as i32 + 2;

    // border 1 是图像外框，视作孔边界
    let mut borders = vec![
        Border {
            is_hole: true,
            parent: 0,
        };
        2
    ];
    let mut contours = Vec::new();
    let mut nbd = 1i32;

    for y in 1..height - 1 {
        let mut lnbd = 1i32;
        for x in 1..width - 1 {
            let p = Point::new(x, y);
            let value = grid.get(p);
            if value == 0 {
                continue;
            }

            let west = Point::new(x - 1, y);
            let east = Point::new(x + 1, y);
            let started = if value == 1 && grid.get(west) == 0 {
                Some((false, west))
            } else if value >= 1 && grid.get(east) == 0 {
                if value > 1 {
                    lnbd = value;
                }
                Some((true, east))
            } else {
                None
            };

            if let Some((is_hole, from)) = started {
                nbd += 1;
                let last = borders[lnbd as usize];
                let parent = if is_hole == last.is_hole {
                    last.parent
                } else {
                    lnbd as usize
                };
                borders.push(Border { is_hole, parent });

                let points = follow_border(&mut grid, p, from, nbd);
                if !is_hole && parent == 1 {
                    let local = points
                        .into_iter()
                        .map(|q| Point::new(q.x - 1, q.y - 1))
                        .collect();
                    contours.push(compress_runs(local));
                }
            }

            let value = grid.get(p);
            if value != 1 {
                lnbd = value.abs();
            }
        }
    }

    contours
}
