/// 可見多邊形（徑向掃描）
///
/// 把所有障礙物頂點依觀察者角度排序，濾掉被擋住的頂點，再沿角度順序
/// 把每個角點以及它「延伸到後方」的交點串成可見區域的邊界。
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::f64::consts::PI;

use super::geometry_utils::{point_in_polygon, point_side, winding_number, Side};
use super::obstruction::{is_point_obstructed, ray_intersect};
use super::{Path, Point2};
use crate::config::VisionConfig;

/// 頂點在掃描中的角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VertexKind {
    /// 前後鄰點都在掃描前方（逆時針側），角度增加時開始遮擋
    Start,
    /// 前後鄰點都在掃描後方，角度增加時結束遮擋
    End,
    /// 其他情況，包含鄰點與視線共線
    Middle,
}

/// 帶角度與角色的頂點
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaggedVertex {
    pub point: Point2,
    /// 以觀察者為原點的 atan2 角度，範圍 (-π, π]
    pub angle: f64,
    pub kind: VertexKind,
}

/// 可見區域邊界，依掃描角度排列；空的代表什麼都看不到（或沒有限制，見 `compute_visibility_polygon`）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VisibilityPolygon {
    pub observer: Point2,
    pub vertices: Path,
}

impl VisibilityPolygon {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// 點是否落在可見多邊形內部
    pub fn contains(&self, point: Point2) -> bool {
        point_in_polygon(point, &self.vertices)
    }
}

fn normalized_angle(direction: Point2) -> f64 {
    let angle = direction.y.atan2(direction.x);
    if angle <= -PI { PI } else { angle }
}

/// 依前後鄰點的位置分類單一頂點
pub fn classify_vertex(observer: Point2, prev: Point2, vertex: Point2, next: Point2) -> VertexKind {
    let direction = vertex - observer;
    let side_prev = point_side(prev, vertex, direction);
    let side_next = point_side(next, vertex, direction);

    match (side_prev, side_next) {
        (Side::Left, Side::Left) => VertexKind::Start,
        (Side::Right, Side::Right) => VertexKind::End,
        _ => VertexKind::Middle,
    }
}

/// 為所有障礙物的頂點標上角度與角色，並依角度排序
///
/// 與觀察者重合的頂點沒有方向，會被略過。
pub fn tag_vertices(observer: Point2, obstacles: &[Path]) -> Vec<TaggedVertex> {
    let mut all_points = Vec::new();

    for polygon in obstacles.iter().filter(|polygon| polygon.len() >= 3) {
        let n = polygon.len();
        for j in 0..n {
            let vertex = polygon[j];
            let direction = vertex - observer;
            if direction.x == 0.0 && direction.y == 0.0 {
                continue;
            }

            let prev = polygon[(j + n - 1) % n];
            let next = polygon[(j + 1) % n];
            all_points.push(TaggedVertex {
                point: vertex,
                angle: normalized_angle(direction),
                kind: classify_vertex(observer, prev, vertex, next),
            });
        }
    }

    // 同角度時近的先
    all_points.sort_by(|a, b| {
        a.angle
            .partial_cmp(&b.angle)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                a.point
                    .distance_squared(observer)
                    .partial_cmp(&b.point.distance_squared(observer))
                    .unwrap_or(Ordering::Equal)
            })
    });

    all_points
}

/// 計算從 `position` 看出去的可見多邊形
///
/// `config.world_bounds` 有設定時，邊界矩形會被當成包住觀察者的牆，
/// 沒有障礙物時結果就是邊界的四個角。沒有設定邊界時，沒有障礙物會回傳
/// 空多邊形，代表視野不受限制；延伸射線打不到任何東西的角點只會輸出角點本身。
///
/// 觀察者在障礙物實心區域內或邊界外面時看不到任何東西，回傳空多邊形。
pub fn compute_visibility_polygon(
    position: Point2,
    obstacles: &[Path],
    config: &VisionConfig,
) -> VisibilityPolygon {
    let tolerance = config.tolerance();
    let mut result = VisibilityPolygon {
        observer: position,
        vertices: Vec::new(),
    };

    // 攤平後外框逆時針、洞順時針，環繞數總和不為零就是實心；重疊的障礙物也一樣
    let winding: i32 = obstacles.iter().map(|polygon| winding_number(position, polygon)).sum();
    if winding != 0 {
        log::debug!("observer ({:.2}, {:.2}) is inside an obstacle", position.x, position.y);
        return result;
    }

    let scene: Cow<[Path]> = match &config.world_bounds {
        Some(bounds) => {
            if !bounds.contains_point(position) {
                log::debug!("observer ({:.2}, {:.2}) is outside the world bounds", position.x, position.y);
                return result;
            }
            let mut with_bounds = obstacles.to_vec();
            with_bounds.push(bounds.corners());
            Cow::Owned(with_bounds)
        }
        None => Cow::Borrowed(obstacles),
    };

    let all_points = tag_vertices(position, &scene);
    let filtered_points: Vec<TaggedVertex> = all_points
        .iter()
        .filter(|tagged| !is_point_obstructed(position, tagged.point, &scene, &tolerance))
        .copied()
        .collect();

    for tagged in &filtered_points {
        let vertex = tagged.point;

        let extended_point = match tagged.kind {
            VertexKind::Middle => None,
            VertexKind::Start | VertexKind::End => {
                let direction = (vertex - position).normalized();
                ray_intersect(vertex, direction.x, direction.y, &scene, &tolerance)
            }
        };

        if tagged.kind == VertexKind::Start {
            if let Some(extended) = extended_point {
                result.vertices.push(extended);
            }
        }

        result.vertices.push(vertex);

        if tagged.kind == VertexKind::End {
            if let Some(extended) = extended_point {
                result.vertices.push(extended);
            }
        }
    }

    log::debug!(
        "visibility from ({:.2}, {:.2}): {} vertices, {} unobstructed, {} boundary points",
        position.x,
        position.y,
        all_points.len(),
        filtered_points.len(),
        result.vertices.len()
    );

    result
}
