/// 障礙物多邊形聯集
///
/// 真正的布林運算交給外部裁切器（`BooleanClipper`）；這裡只負責把障礙物轉成
/// 裁切器要的格式，並把回傳的輪廓整理成樹狀結構。
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::panic::{self, AssertUnwindSafe};
use tess2_rust::tess::TESS_UNDEF;
use tess2_rust::{ElementType, TessStatus, Tessellator, WindingRule};
use vek::Vec2;

use super::geometry_utils::{cross, point_in_polygon, signed_area};
use super::{Path, Paths, Point2};
use crate::error::{Result, VisionError};

/// 聯集樹節點
///
/// 根節點的 `polygon` 為空，第一層子節點是外輪廓，再下一層是洞，依此類推。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolyNode {
    pub polygon: Path,
    pub is_hole: bool,
    pub children: Vec<PolyNode>,
}

impl PolyNode {
    fn new(polygon: Path, is_hole: bool) -> Self {
        Self {
            polygon,
            is_hole,
            children: Vec::new(),
        }
    }

    /// 包含自己在內的輪廓數量（根節點的空多邊形不算）
    pub fn count(&self) -> usize {
        let own = if self.polygon.is_empty() { 0 } else { 1 };
        own + self.children.iter().map(PolyNode::count).sum::<usize>()
    }

    /// 把輪廓插到最深一層包含它的節點底下
    fn insert(&mut self, contour: PolyNode) {
        let anchor = contour.polygon[0];
        let owner = self.children.iter().position(|child| {
            child.polygon.len() >= 3
                && signed_area(&child.polygon).abs() > signed_area(&contour.polygon).abs()
                && point_in_polygon(anchor, &child.polygon)
        });

        match owner {
            Some(index) => self.children[index].insert(contour),
            None => self.children.push(contour),
        }
    }
}

/// 聯集結果
pub type PolyTree = PolyNode;

/// 外部布林裁切器
///
/// 依正向填充規則（winding > 0 視為內部）回傳聯集後的封閉邊界輪廓，
/// 外輪廓逆時針、洞順時針。
pub trait BooleanClipper {
    fn union(&self, subjects: &[Path]) -> Result<Paths>;
}

/// 以 tess2 實作聯集
///
/// 先把互相交叉的邊在交點切開，讓三角化器只會遇到共用的頂點；再以正向填充規則
/// 三角化，最後只保留出現一次的三角形邊，串成外輪廓（逆時針）與洞（順時針）。
/// 三角化器若仍需自行產生交點、回報失敗或在內部 panic，都回傳 `UnionFailed`。
///
/// 每個障礙物在送出前都會轉成逆時針，所以不論原本的繞向都算實心覆蓋；
/// 順時針的輸入不會被當成負環繞數去挖掉其他障礙物。
#[derive(Debug, Default, Clone, Copy)]
pub struct TessClipper;

impl BooleanClipper for TessClipper {
    fn union(&self, subjects: &[Path]) -> Result<Paths> {
        let contours: Vec<Vec<f64>> = split_at_crossings(subjects)
            .iter()
            .map(|subject| {
                // 統一成逆時針，讓每個障礙物貢獻 +1 的環繞數
                if signed_area(subject) >= 0.0 {
                    subject.iter().flat_map(|p| [p.x, p.y]).collect()
                } else {
                    subject.iter().rev().flat_map(|p| [p.x, p.y]).collect()
                }
            })
            .collect();

        let (vertices, triangles) = panic::catch_unwind(AssertUnwindSafe(|| triangulate(&contours)))
            .map_err(|_| VisionError::union_failed("tessellator panicked"))??;

        boundary_contours(&vertices, &triangles)
    }
}

/// 以正向填充規則三角化，回傳頂點座標與三角形索引
fn triangulate(contours: &[Vec<f64>]) -> Result<(Vec<f64>, Vec<u32>)> {
    let mut tess = Tessellator::new();
    for coords in contours {
        tess.add_contour(2, coords);
    }

    let ok = tess.tessellate(
        WindingRule::Positive,
        ElementType::Polygons,
        3,
        2,
        Some([0.0, 0.0, 1.0]),
    );
    if !ok || tess.get_status() != TessStatus::Ok {
        return Err(VisionError::union_failed(format!(
            "tessellator status {:?}",
            tess.get_status()
        )));
    }

    if tess.vertex_indices().iter().any(|&index| index == TESS_UNDEF) {
        return Err(VisionError::union_failed("tessellator produced an unplaced intersection vertex"));
    }

    Ok((tess.vertices().to_vec(), tess.elements().to_vec()))
}

/// 兩線段內部互相穿越時回傳兩邊各自的參數 `(t, u)`，端點接觸不算
fn crossing_params(p1: Point2, p2: Point2, p3: Point2, p4: Point2) -> Option<(f64, f64)> {
    let d1 = p2 - p1;
    let d2 = p4 - p3;
    let denominator = cross(d1, d2);
    if denominator.abs() < CROSSING_EPSILON {
        return None;
    }

    let to_p3 = p3 - p1;
    let t = cross(to_p3, d2) / denominator;
    let u = cross(to_p3, d1) / denominator;
    let interior = |v: f64| v > CROSSING_EPSILON && v < 1.0 - CROSSING_EPSILON;
    if interior(t) && interior(u) {
        Some((t, u))
    } else {
        None
    }
}

const CROSSING_EPSILON: f64 = 1e-9;

fn bounding_box(path: &[Point2]) -> (Point2, Point2) {
    path.iter().fold(
        (Vec2::broadcast(f64::INFINITY), Vec2::broadcast(f64::NEG_INFINITY)),
        |(min, max), p| (Vec2::partial_min(min, *p), Vec2::partial_max(max, *p)),
    )
}

/// 在所有交叉點把邊切開，兩條邊插入的是同一個點
fn split_at_crossings(subjects: &[Path]) -> Paths {
    let boxes: Vec<(Point2, Point2)> = subjects.iter().map(|path| bounding_box(path)).collect();
    let mut splits: Vec<Vec<Vec<(f64, Point2)>>> =
        subjects.iter().map(|path| vec![Vec::new(); path.len()]).collect();
    let mut crossings = 0;

    for i in 0..subjects.len() {
        for j in i..subjects.len() {
            let (min_a, max_a) = boxes[i];
            let (min_b, max_b) = boxes[j];
            if max_a.x < min_b.x || max_b.x < min_a.x || max_a.y < min_b.y || max_b.y < min_a.y {
                continue;
            }

            let (a, b) = (&subjects[i], &subjects[j]);
            for ea in 0..a.len() {
                // 同一個多邊形只比對不相鄰的邊
                let first_eb = if i == j { ea + 2 } else { 0 };
                for eb in first_eb..b.len() {
                    if i == j && ea == 0 && eb == b.len() - 1 {
                        continue;
                    }
                    let (p1, p2) = (a[ea], a[(ea + 1) % a.len()]);
                    let (p3, p4) = (b[eb], b[(eb + 1) % b.len()]);
                    if let Some((t, u)) = crossing_params(p1, p2, p3, p4) {
                        let point = p1 + (p2 - p1) * t;
                        splits[i][ea].push((t, point));
                        splits[j][eb].push((u, point));
                        crossings += 1;
                    }
                }
            }
        }
    }

    if crossings == 0 {
        return subjects.to_vec();
    }
    log::trace!("split obstacle edges at {} crossings", crossings);

    subjects
        .iter()
        .zip(splits)
        .map(|(path, mut edge_splits)| {
            let mut noded = Path::with_capacity(path.len());
            for (vertex, inserted) in path.iter().zip(edge_splits.iter_mut()) {
                noded.push(*vertex);
                inserted.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
                noded.extend(inserted.iter().map(|(_, point)| *point));
            }
            noded
        })
        .collect()
}

/// `from` 順時針轉到 `to` 的角度，範圍 (0, 2π]
fn clockwise_angle(from: Point2, to: Point2) -> f64 {
    let angle = cross(to, from).atan2(from.dot(to));
    if angle <= 0.0 { angle + 2.0 * PI } else { angle }
}

/// 從三角網格取出邊界輪廓
///
/// 內部的邊會被相鄰兩個三角形以相反方向各走一次而互相抵消，剩下的就是邊界，
/// 方向讓填充區域保持在左手邊。
fn boundary_contours(vertices: &[f64], triangles: &[u32]) -> Result<Paths> {
    let vertex_count = vertices.len() / 2;
    let point = |index: u32| {
        let i = index as usize * 2;
        Vec2::new(vertices[i], vertices[i + 1])
    };

    let triangles: Vec<[u32; 3]> = triangles
        .chunks_exact(3)
        .filter(|tri| tri.iter().all(|&index| index != TESS_UNDEF))
        .map(|tri| [tri[0], tri[1], tri[2]])
        .collect();
    if triangles.iter().flatten().any(|&index| index as usize >= vertex_count) {
        return Err(VisionError::union_failed("triangle index out of range"));
    }

    // 三角化器輸出的方向一致，依總面積統一成逆時針
    let total_area: f64 = triangles
        .iter()
        .map(|tri| cross(point(tri[1]) - point(tri[0]), point(tri[2]) - point(tri[0])))
        .sum();
    let flip = total_area < 0.0;

    let mut net: HashMap<(u32, u32), i32> = HashMap::new();
    for tri in &triangles {
        for k in 0..3 {
            let (mut a, mut b) = (tri[k], tri[(k + 1) % 3]);
            if flip {
                std::mem::swap(&mut a, &mut b);
            }
            if a < b {
                *net.entry((a, b)).or_insert(0) += 1;
            } else {
                *net.entry((b, a)).or_insert(0) -= 1;
            }
        }
    }

    let mut edges: Vec<(u32, u32)> = net
        .into_iter()
        .filter_map(|((a, b), count)| match count {
            1 => Some((a, b)),
            -1 => Some((b, a)),
            _ => None,
        })
        .collect();
    edges.sort_unstable();

    let mut outgoing: HashMap<u32, Vec<usize>> = HashMap::new();
    for (index, (from, _)) in edges.iter().enumerate() {
        outgoing.entry(*from).or_default().push(index);
    }

    let mut used = vec![false; edges.len()];
    let mut contours = Paths::new();
    for first in 0..edges.len() {
        if used[first] {
            continue;
        }

        let mut contour = Path::new();
        let mut current = first;
        loop {
            used[current] = true;
            let (from, to) = edges[current];
            contour.push(point(from));

            // 在共用頂點上選最靠左的出邊，把只有一點相接的區域拆成獨立的輪廓
            let incoming = point(to) - point(from);
            let next = outgoing
                .get(&to)
                .and_then(|candidates| {
                    candidates.iter().copied().min_by(|&x, &y| {
                        let ax = clockwise_angle(-incoming, point(edges[x].1) - point(to));
                        let ay = clockwise_angle(-incoming, point(edges[y].1) - point(to));
                        ax.partial_cmp(&ay).unwrap_or(std::cmp::Ordering::Equal)
                    })
                })
                .ok_or_else(|| VisionError::union_failed("open boundary in tessellation"))?;

            if next == first {
                break;
            }
            if used[next] {
                return Err(VisionError::union_failed("tangled boundary in tessellation"));
            }
            current = next;
        }
        contours.push(contour);
    }

    Ok(contours)
}

/// 計算所有障礙物的聯集
///
/// 空的或少於三個頂點的多邊形會直接略過。沒有任何有效輸入時回傳空樹。
pub fn find_polygon_union<C: BooleanClipper + ?Sized>(polygons: &[Path], clipper: &C) -> Result<PolyTree> {
    let subjects: Paths = polygons
        .iter()
        .filter(|polygon| {
            let keep = polygon.len() >= 3;
            if !keep && !polygon.is_empty() {
                log::trace!("dropping degenerate obstacle with {} vertices", polygon.len());
            }
            keep
        })
        .cloned()
        .collect();

    let mut tree = PolyTree::default();
    if subjects.is_empty() {
        return Ok(tree);
    }

    let mut contours = clipper.union(&subjects)?;
    contours.retain(|contour| contour.len() >= 3);

    // 由大到小插入，父輪廓一定先進樹
    contours.sort_by(|a, b| {
        signed_area(b).abs().partial_cmp(&signed_area(a).abs()).unwrap_or(std::cmp::Ordering::Equal)
    });
    for contour in contours {
        let is_hole = signed_area(&contour) < 0.0;
        tree.insert(PolyNode::new(contour, is_hole));
    }

    log::debug!("union of {} obstacles produced {} contours", subjects.len(), tree.count());
    Ok(tree)
}
