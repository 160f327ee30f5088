/// Open MOBA Vision Library
///
/// 方格地圖上的牆壁遮擋視野：可見多邊形與視線查詢

pub mod config;
pub mod error;
pub mod map;
pub mod vision;

// Re-export commonly used types
pub use crate::config::{Tolerance, VisionConfig};
pub use crate::error::{Result, VisionError};
pub use crate::map::{Cell, ObstacleSource, WallGrid};
pub use crate::vision::*;
