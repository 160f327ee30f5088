/// 聯集樹攤平與路徑簡化
///
/// 視野計算把每個多邊形都當成實心，所以洞與洞裡的島都攤平成獨立的多邊形。
use super::geometry_utils::point_to_segment_distance;
use super::polygon_union::PolyTree;
use super::{Path, Paths, Point2};

/// 深度優先攤平：先放節點本身，再依序放每個子樹，最後做簡化
pub fn flatten_poly_tree(tree: &PolyTree, simplify_epsilon: f64) -> Paths {
    let mut paths = Paths::new();
    let mut stack = vec![tree];

    while let Some(node) = stack.pop() {
        if !node.polygon.is_empty() {
            paths.push(node.polygon.clone());
        }
        // 反向壓入，彈出時才會維持原本的子節點順序
        stack.extend(node.children.iter().rev());
    }

    simplify_paths(&paths, simplify_epsilon)
}

/// 簡化多條封閉路徑，化簡後少於三個頂點的路徑會被丟掉
pub fn simplify_paths(paths: &[Path], epsilon: f64) -> Paths {
    paths
        .iter()
        .map(|path| simplify_path(path, epsilon))
        .filter(|path| path.len() >= 3)
        .collect()
}

/// 簡化一條封閉路徑
///
/// 反覆移除「到前後鄰點連線距離最小且小於 `epsilon`」的頂點，
/// 直到沒有可移除的頂點為止。重複點與近似共線點都會被這樣清掉。
pub fn simplify_path(path: &[Point2], epsilon: f64) -> Path {
    let mut points: Path = path.to_vec();

    while points.len() >= 3 {
        let n = points.len();
        let mut candidate: Option<(usize, f64)> = None;

        for i in 0..n {
            let prev = points[(i + n - 1) % n];
            let next = points[(i + 1) % n];
            let distance = point_to_segment_distance(points[i], prev, next);
            if distance < epsilon && candidate.map_or(true, |(_, best)| distance < best) {
                candidate = Some((i, distance));
            }
        }

        match candidate {
            Some((index, _)) => {
                points.remove(index);
            }
            None => break,
        }
    }

    if points.len() < 3 {
        points.clear();
    }
    points
}
