/// 設定模組
pub mod vision_config;

pub use vision_config::{Tolerance, VisionConfig};
