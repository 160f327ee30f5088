/// 交點與距離的基本運算
///
/// 全部都是純函式；找不到交點是正常結果，回傳 `None`。
use super::Point2;

/// 點相對於有向直線的位置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// 逆時針側
    Left,
    /// 順時針側
    Right,
    OnLine,
}

/// 二維叉積（純量）
#[inline]
pub fn cross(a: Point2, b: Point2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// 判斷 `point` 在通過 `line_point`、方向為 `direction` 的直線哪一側
pub fn point_side(point: Point2, line_point: Point2, direction: Point2) -> Side {
    let c = cross(direction, point - line_point);
    if c > 0.0 {
        Side::Left
    } else if c < 0.0 {
        Side::Right
    } else {
        Side::OnLine
    }
}

/// 射線與線段相交
///
/// 射線為 `origin + t·(dx, dy)`，`t ≥ 0`；線段參數 `u ∈ [0, 1]`。
/// 行列式絕對值小於 `parallel_epsilon` 時視為平行，不回傳交點。
pub fn ray_segment_intersect(
    origin: Point2,
    dx: f64,
    dy: f64,
    a: Point2,
    b: Point2,
    parallel_epsilon: f64,
) -> Option<Point2> {
    let s_dx = b.x - a.x;
    let s_dy = b.y - a.y;

    let denominator = dx * s_dy - dy * s_dx;
    if denominator.abs() < parallel_epsilon {
        return None;
    }

    let to_a = a - origin;
    let t = (to_a.x * s_dy - to_a.y * s_dx) / denominator;
    let u = (to_a.x * dy - to_a.y * dx) / denominator;

    if t >= 0.0 && (0.0..=1.0).contains(&u) {
        Some(Point2::new(origin.x + t * dx, origin.y + t * dy))
    } else {
        None
    }
}

/// 線段與線段相交，兩個參數都限制在 `[0, 1]`
pub fn segment_segment_intersect(
    p1: Point2,
    p2: Point2,
    p3: Point2,
    p4: Point2,
    parallel_epsilon: f64,
) -> Option<Point2> {
    let d1 = p2 - p1;
    let d2 = p4 - p3;

    let denominator = cross(d1, d2);
    if denominator.abs() < parallel_epsilon {
        return None;
    }

    let to_p3 = p3 - p1;
    let t = cross(to_p3, d2) / denominator;
    let u = cross(to_p3, d1) / denominator;

    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(p1 + d1 * t)
    } else {
        None
    }
}

/// 計算點到線段的最短距離
pub fn point_to_segment_distance(point: Point2, line_start: Point2, line_end: Point2) -> f64 {
    let line_vec = line_end - line_start;
    let point_vec = point - line_start;

    let line_length_sq = line_vec.magnitude_squared();
    if line_length_sq == 0.0 {
        return point_vec.magnitude();
    }

    let t = (point_vec.dot(line_vec) / line_length_sq).max(0.0).min(1.0);
    let projection = line_start + line_vec * t;
    (point - projection).magnitude()
}

/// 有號面積，逆時針為正
pub fn signed_area(path: &[Point2]) -> f64 {
    if path.len() < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..path.len() {
        let a = path[i];
        let b = path[(i + 1) % path.len()];
        area += cross(a, b);
    }
    area * 0.5
}

/// 射線法判斷點是否在多邊形內（邊界上的結果不保證）
pub fn point_in_polygon(point: Point2, path: &[Point2]) -> bool {
    if path.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = path.len() - 1;
    for i in 0..path.len() {
        let pi = path[i];
        let pj = path[j];
        if (pi.y > point.y) != (pj.y > point.y) {
            let x_cross = pj.x + (point.y - pj.y) * (pi.x - pj.x) / (pi.y - pj.y);
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// 多邊形繞點的環繞數，逆時針為正
pub fn winding_number(point: Point2, path: &[Point2]) -> i32 {
    if path.len() < 3 {
        return 0;
    }
    let mut winding = 0;
    let mut j = path.len() - 1;
    for i in 0..path.len() {
        let a = path[j];
        let b = path[i];
        let side = cross(b - a, point - a);
        if a.y <= point.y {
            if b.y > point.y && side > 0.0 {
                winding += 1;
            }
        } else if b.y <= point.y && side < 0.0 {
            winding -= 1;
        }
        j = i;
    }
    winding
}
