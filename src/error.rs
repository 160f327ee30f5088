/// 視野系統錯誤
///
/// 找不到交點屬於正常結果（以 `None` 表示），不會出現在這裡；
/// 只有聯集失敗與設定讀取失敗需要呼叫端處理。
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VisionError {
    /// 布林裁切器拒絕或無法處理輸入的障礙物
    #[error("polygon union failed: {reason}")]
    UnionFailed { reason: String },

    /// 設定檔格式錯誤
    #[error("invalid vision config: {0}")]
    Config(#[from] toml::de::Error),

    /// 設定檔讀取失敗
    #[error("cannot read vision config: {0}")]
    Io(#[from] std::io::Error),
}

impl VisionError {
    pub fn union_failed(reason: impl Into<String>) -> Self {
        VisionError::UnionFailed { reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, VisionError>;
