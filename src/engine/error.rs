// ==========================================
// 工业传感器监测系统 - 引擎层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    // ===== 模型文件错误 =====
    #[error("模型文件不存在: {0}（请先执行训练）")]
    ModelNotFound(String),

    #[error("模型文件读写失败 ({path}): {message}")]
    ArtifactIo { path: String, message: String },

    #[error("模型文件解析失败 ({path}): {message}")]
    ArtifactFormat { path: String, message: String },

    #[error("模型版本不兼容: 期望 {expected}, 实际 {actual}")]
    ArtifactVersion { expected: u32, actual: u32 },

    // ===== 输入错误 =====
    #[error("特征维度不符: 期望 {expected}, 实际 {actual}")]
    FeatureDimension { expected: usize, actual: usize },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    Internal(String),
}

impl From<crate::repository::RepositoryError> for EngineError {
    fn from(err: crate::repository::RepositoryError) -> Self {
        EngineError::Internal(err.to_string())
    }
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
