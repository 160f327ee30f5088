/// 地圖模組
///
/// 把地圖狀態轉成視野計算要的障礙物多邊形
pub mod wall_grid;

pub use wall_grid::{Cell, ObstacleSource, WallGrid};
