use serde::{Deserialize, Serialize};

use super::Point;

/// Geometric obstacle primitive. Rectangles are axis aligned and anchored at their top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum Obstacle {
    Rect { x: f64, y: f64, w: f64, h: f64 },
    Circle { cx: f64, cy: f64, r: f64 },
}

impl Obstacle {
    pub const fn rect(x: f64, y: f64, w: f64, h: f64) -> Self {
        Obstacle::Rect { x, y, w, h }
    }

    pub const fn circle(cx: f64, cy: f64, r: f64) -> Self {
        Obstacle::Circle { cx, cy, r }
    }

    pub fn is_well_formed(&self) -> bool {
        match *self {
            Obstacle::Rect { x, y, w, h } => {
                [x, y, w, h].iter().all(|v| v.is_finite()) && w > 0.0 && h > 0.0
            }
            Obstacle::Circle { cx, cy, r } => {
                [cx, cy, r].iter().all(|v| v.is_finite()) && r > 0.0
            }
        }
    }

    pub fn contains(&self, point: &Point, clearance: f64) -> bool {
        match *self {
            Obstacle::Rect { x, y, w, h } => {
                x - clearance <= point.x
                    && point.x <= x + w + clearance
                    && y - clearance <= point.y
                    && point.y <= y + h + clearance
            }
            Obstacle::Circle { cx, cy, r } => Point::new(cx, cy).distance(point) <= r + clearance,
        }
    }

    pub fn intersects_segment(&self, p1: &Point, p2: &Point) -> bool {
        match *self {
            Obstacle::Rect { x, y, w, h } => segment_hits_rect(p1, p2, x, x + w, y, y + h),
            Obstacle::Circle { cx, cy, r } => {
                let center = Point::new(cx, cy);
                closest_on_segment(p1, p2, &center).distance(&center) <= r
            }
        }
    }

    pub fn overlaps(&self, other: &Obstacle) -> bool {
        match (*self, *other) {
            (
                Obstacle::Rect { x, y, w, h },
                Obstacle::Rect {
                    x: x2,
                    y: y2,
                    w: w2,
                    h: h2,
                },
            ) => x < x2 + w2 && x + w > x2 && y < y2 + h2 && y + h > y2,
            (
                Obstacle::Circle { cx, cy, r },
                Obstacle::Circle {
                    cx: cx2,
                    cy: cy2,
                    r: r2,
                },
            ) => Point::new(cx, cy).distance(&Point::new(cx2, cy2)) < r + r2,
            (Obstacle::Circle { cx, cy, r }, Obstacle::Rect { x, y, w, h })
            | (Obstacle::Rect { x, y, w, h }, Obstacle::Circle { cx, cy, r }) => {
                let closest_x = cx.clamp(x, x + w);
                let closest_y = cy.clamp(y, y + h);
                (cx - closest_x).powi(2) + (cy - closest_y).powi(2) < r * r
            }
        }
    }
}

pub fn path_blocked(p1: &Point, p2: &Point, obstacles: &[Obstacle]) -> bool {
    obstacles.iter().any(|o| o.intersects_segment(p1, p2))
}

fn closest_on_segment(a: &Point, b: &Point, target: &Point) -> Point {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let ab_len2 = abx * abx + aby * aby;
    let t = if ab_len2 > 0.0 {
        ((target.x - a.x) * abx + (target.y - a.y) * aby) / ab_len2
    } else {
        0.0
    };
    a.lerp(b, t.clamp(0.0, 1.0))
}

/// Liang-Barsky clip of the segment against the closed box.
fn segment_hits_rect(p1: &Point, p2: &Point, xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> bool {
    let dx = p2.x - p1.x;
    let dy = p2.y - p1.y;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    for (p, q) in [
        (-dx, p1.x - xmin),
        (dx, xmax - p1.x),
        (-dy, p1.y - ymin),
        (dy, ymax - p1.y),
    ] {
        if p == 0.0 {
            // Parallel to this edge: reject if outside it
            if q < 0.0 {
                return false;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return false;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return false;
            }
            t1 = t1.min(r);
        }
    }
    t0 <= t1
}
