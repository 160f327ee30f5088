/// 視野計算入口
///
/// 把聯集、攤平、可見多邊形與遮擋查詢包成一個物件，持有設定但不保存任何
/// 查詢之間的狀態。同一份障礙物快照可以給多個觀察者重複使用。
use super::flatten::flatten_poly_tree;
use super::obstruction::is_point_obstructed;
use super::polygon_union::{find_polygon_union, BooleanClipper, TessClipper};
use super::visibility_polygon::{compute_visibility_polygon, VisibilityPolygon};
use super::{Bounds, Path, Paths, Point2};
use crate::config::VisionConfig;
use crate::error::Result;
use crate::map::ObstacleSource;

/// 從障礙物來源整理出的快照，連同該地圖的世界邊界
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObstacleSnapshot {
    pub obstacles: Paths,
    pub world_bounds: Option<Bounds>,
}

/// 視野計算器
pub struct VisionCalculator<C: BooleanClipper = TessClipper> {
    config: VisionConfig,
    clipper: C,
}

impl VisionCalculator<TessClipper> {
    /// 創建新的視野計算器
    pub fn new() -> Self {
        Self::with_config(VisionConfig::default())
    }

    pub fn with_config(config: VisionConfig) -> Self {
        Self {
            config,
            clipper: TessClipper,
        }
    }
}

impl<C: BooleanClipper> VisionCalculator<C> {
    /// 使用自訂的布林裁切器
    pub fn with_clipper(config: VisionConfig, clipper: C) -> Self {
        Self { config, clipper }
    }

    pub fn config(&self) -> &VisionConfig {
        &self.config
    }

    /// 聯集並攤平障礙物，失敗時回傳錯誤
    pub fn try_prepare_obstacles(&self, polygons: &[Path]) -> Result<Paths> {
        let tree = find_polygon_union(polygons, &self.clipper)?;
        Ok(flatten_poly_tree(&tree, self.config.simplify_epsilon))
    }

    /// 聯集並攤平障礙物
    ///
    /// 聯集失敗時退回原本（可能重疊）的障礙物，只去掉退化的多邊形；
    /// 重疊只會多出一些邊界頂點，不影響正確性。
    pub fn prepare_obstacles(&self, polygons: &[Path]) -> Paths {
        match self.try_prepare_obstacles(polygons) {
            Ok(paths) => paths,
            Err(e) => {
                log::warn!("{}, falling back to {} unmerged obstacles", e, polygons.len());
                polygons.iter().filter(|polygon| polygon.len() >= 3).cloned().collect()
            }
        }
    }

    /// 從障礙物來源取出快照並整理
    ///
    /// 設定裡有世界邊界時以設定為準，否則採用來源提供的邊界。邊界只記在快照上，
    /// 計算器本身的設定不變，換地圖重建時不會沿用上一張地圖的邊界。
    pub fn prepare_from_source<S: ObstacleSource + ?Sized>(&self, source: &S) -> ObstacleSnapshot {
        ObstacleSnapshot {
            obstacles: self.prepare_obstacles(&source.obstacles()),
            world_bounds: self.config.world_bounds.or_else(|| source.world_bounds()),
        }
    }

    /// 以快照的障礙物與世界邊界計算可見多邊形
    pub fn snapshot_visibility(&self, observer: Point2, snapshot: &ObstacleSnapshot) -> VisibilityPolygon {
        let config = VisionConfig {
            world_bounds: snapshot.world_bounds,
            ..self.config.clone()
        };
        compute_visibility_polygon(observer, &snapshot.obstacles, &config)
    }

    /// 計算可見多邊形
    pub fn visibility_polygon(&self, observer: Point2, obstacles: &[Path]) -> VisibilityPolygon {
        compute_visibility_polygon(observer, obstacles, &self.config)
    }

    /// 兩點間的視線是否被擋住
    pub fn is_obstructed(&self, from: Point2, to: Point2, obstacles: &[Path]) -> bool {
        is_point_obstructed(from, to, obstacles, &self.config.tolerance())
    }

    /// 兩點間的視線是否暢通
    pub fn is_line_of_sight_clear(&self, from: Point2, to: Point2, obstacles: &[Path]) -> bool {
        !self.is_obstructed(from, to, obstacles)
    }
}

impl Default for VisionCalculator<TessClipper> {
    fn default() -> Self {
        Self::new()
    }
}
