use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::Result;
use crate::vision::Bounds;

/// 幾何容差
///
/// 這些數值跟地圖尺度綁定（一格 = 1.0 世界單位），換尺度時要一起調整。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// 行列式絕對值小於此值視為平行
    pub parallel_epsilon: f64,
    /// 距離起點平方小於等於此值的交點視為自交雜訊
    pub self_hit_epsilon_sq: f64,
    /// 交點與目標點的平方距離差小於此值視為碰到目標本身
    pub contact_epsilon_sq: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            parallel_epsilon: default_parallel_epsilon(),
            self_hit_epsilon_sq: default_self_hit_epsilon_sq(),
            contact_epsilon_sq: default_contact_epsilon_sq(),
        }
    }
}

/// 視野計算設定
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VisionConfig {
    #[serde(default = "default_parallel_epsilon")]
    pub parallel_epsilon: f64,
    #[serde(default = "default_self_hit_epsilon_sq")]
    pub self_hit_epsilon_sq: f64,
    #[serde(default = "default_contact_epsilon_sq")]
    pub contact_epsilon_sq: f64,
    /// 聯集後簡化路徑的距離容差
    #[serde(default = "default_simplify_epsilon")]
    pub simplify_epsilon: f64,
    /// 世界邊界；設定後會當成包住觀察者的牆
    #[serde(default)]
    pub world_bounds: Option<Bounds>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
struct Setting {
    #[serde(default)]
    vision: VisionConfig,
}

fn default_parallel_epsilon() -> f64 {
    1e-10
}

fn default_self_hit_epsilon_sq() -> f64 {
    0.01
}

fn default_contact_epsilon_sq() -> f64 {
    1e-9
}

fn default_simplify_epsilon() -> f64 {
    0.025
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            parallel_epsilon: default_parallel_epsilon(),
            self_hit_epsilon_sq: default_self_hit_epsilon_sq(),
            contact_epsilon_sq: default_contact_epsilon_sq(),
            simplify_epsilon: default_simplify_epsilon(),
            world_bounds: None,
        }
    }
}

impl VisionConfig {
    /// 從 TOML 字串讀取 `[vision]` 區段，缺少的欄位用預設值
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let setting: Setting = toml::from_str(content)?;
        Ok(setting.vision)
    }

    /// 從設定檔讀取
    pub fn load(file_path: impl AsRef<Path>) -> Result<Self> {
        let mut file = File::open(file_path.as_ref())?;
        let mut str_val = String::new();
        file.read_to_string(&mut str_val)?;
        Self::from_toml_str(&str_val)
    }

    pub fn with_world_bounds(mut self, bounds: Bounds) -> Self {
        self.world_bounds = Some(bounds);
        self
    }

    pub fn tolerance(&self) -> Tolerance {
        Tolerance {
            parallel_epsilon: self.parallel_epsilon,
            self_hit_epsilon_sq: self.self_hit_epsilon_sq,
            contact_epsilon_sq: self.contact_epsilon_sq,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vek::Vec2;

    #[test]
    fn test_default_constants() {
        let config = VisionConfig::default();
        assert_eq!(config.parallel_epsilon, 1e-10);
        assert_eq!(config.self_hit_epsilon_sq, 0.01);
        assert_eq!(config.simplify_epsilon, 0.025);
        assert!(config.world_bounds.is_none());
        assert_eq!(config.tolerance(), Tolerance::default());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = VisionConfig::from_toml_str(
            r#"
            [vision]
            simplify_epsilon = 0.05

            [vision.world_bounds]
            min = { x = 0.0, y = 0.0 }
            max = { x = 32.0, y = 24.0 }
            "#,
        ).unwrap();

        assert_eq!(config.simplify_epsilon, 0.05);
        assert_eq!(config.self_hit_epsilon_sq, 0.01);
        let bounds = config.world_bounds.unwrap();
        assert_eq!(bounds.max, Vec2::new(32.0, 24.0));
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = VisionConfig::from_toml_str("").unwrap();
        assert_eq!(config, VisionConfig::default());
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        let err = VisionConfig::from_toml_str("[vision]\nsimplify_epsilon = \"far\"").unwrap_err();
        assert!(matches!(err, crate::error::VisionError::Config(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = VisionConfig::load("definitely/not/here/vision.toml").unwrap_err();
        assert!(matches!(err, crate::error::VisionError::Io(_)));
    }
}
