// ==========================================
// 工业传感器监测系统 - 数据集导入导出错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 数据集 CSV 导入导出错误
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件读写失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV 解析失败: {0}")]
    Csv(#[from] csv::Error),

    // ===== 数据映射错误 =====
    #[error("列数不符 (行 {row}): 期望 {expected} 列,实际 {found} 列")]
    ColumnCount {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("字段解析失败 (行 {row}, 列 {column}): {message}")]
    FieldParse {
        row: usize,
        column: String,
        message: String,
    },
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
