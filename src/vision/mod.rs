/// 視野系統模組
///
/// 包含障礙物聯集、攤平、可見多邊形與視線遮擋查詢
pub mod bounds;
pub mod geometry_utils;
pub mod obstruction;
pub mod polygon_union;
pub mod flatten;
pub mod visibility_polygon;
pub mod calculator;

/// 平面座標點
pub type Point2 = vek::Vec2<f64>;
/// 封閉多邊形，頂點依序排列，最後一點隱含連回第一點
pub type Path = Vec<Point2>;
pub type Paths = Vec<Path>;

pub use self::{
    bounds::Bounds,
    calculator::{ObstacleSnapshot, VisionCalculator},
    flatten::{flatten_poly_tree, simplify_paths},
    obstruction::{is_point_obstructed, line_intersect, ray_intersect},
    polygon_union::{find_polygon_union, BooleanClipper, PolyNode, PolyTree, TessClipper},
    visibility_polygon::{compute_visibility_polygon, VertexKind, VisibilityPolygon},
};
