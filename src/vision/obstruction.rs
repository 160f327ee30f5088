/// 視線遮擋查詢
///
/// 每次查詢都掃過所有障礙物的每條邊（包含首尾相連的封閉邊），
/// 保留最近的有效交點。沒有空間索引，成本與邊數成正比。
use super::geometry_utils::{ray_segment_intersect, segment_segment_intersect};
use super::{Path, Point2};
use crate::config::Tolerance;

/// 依序走訪每個障礙物的每條邊，少於三個頂點的多邊形直接跳過
fn edges(obstacles: &[Path]) -> impl Iterator<Item = (Point2, Point2)> + '_ {
    obstacles
        .iter()
        .filter(|polygon| polygon.len() >= 3)
        .flat_map(|polygon| {
            (0..polygon.len()).map(move |i| (polygon[i], polygon[(i + 1) % polygon.len()]))
        })
}

/// 從 `hits` 中挑出離 `origin` 最近、且不是自交雜訊的交點
fn closest_hit(
    origin: Point2,
    hits: impl Iterator<Item = Point2>,
    self_hit_epsilon_sq: f64,
) -> Option<Point2> {
    let mut closest_distance = f64::INFINITY;
    let mut closest_intersection = None;

    for hit in hits {
        let current_distance = hit.distance_squared(origin);
        if current_distance > self_hit_epsilon_sq && current_distance < closest_distance {
            closest_distance = current_distance;
            closest_intersection = Some(hit);
        }
    }

    closest_intersection
}

/// 射線與整個障礙物集合的最近交點
pub fn ray_intersect(
    origin: Point2,
    dx: f64,
    dy: f64,
    obstacles: &[Path],
    tolerance: &Tolerance,
) -> Option<Point2> {
    let hits = edges(obstacles).filter_map(|(a, b)| {
        ray_segment_intersect(origin, dx, dy, a, b, tolerance.parallel_epsilon)
    });
    closest_hit(origin, hits, tolerance.self_hit_epsilon_sq)
}

/// 線段與整個障礙物集合的最近交點
pub fn line_intersect(
    line_start: Point2,
    line_end: Point2,
    obstacles: &[Path],
    tolerance: &Tolerance,
) -> Option<Point2> {
    let hits = edges(obstacles).filter_map(|(a, b)| {
        segment_segment_intersect(line_start, line_end, a, b, tolerance.parallel_epsilon)
    });
    closest_hit(line_start, hits, tolerance.self_hit_epsilon_sq)
}

/// 從 `position` 看向 `point` 是否被擋住
///
/// 最近交點比目標本身更靠近觀察者才算遮擋；交點落在目標上（例如目標就是
/// 障礙物的角點）不算。
pub fn is_point_obstructed(
    position: Point2,
    point: Point2,
    obstacles: &[Path],
    tolerance: &Tolerance,
) -> bool {
    match line_intersect(position, point, obstacles, tolerance) {
        Some(hit) => {
            let hit_distance = hit.distance_squared(position);
            let target_distance = point.distance_squared(position);
            hit_distance < target_distance - tolerance.contact_epsilon_sq
        }
        None => false,
    }
}
