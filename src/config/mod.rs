// ==========================================
// 工业传感器监测系统 - 配置层
// ==========================================
// 职责: 系统配置管理与默认路径解析
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod paths;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use paths::{default_db_path, default_model_path, DB_PATH_ENV, MODEL_PATH_ENV};
