// ==========================================
// 工业传感器监测系统 - 默认路径解析
// ==========================================
// 职责: 数据库与模型工件的默认落位
// 优先级: 环境变量 > 用户数据目录 > 当前目录
// ==========================================

use std::path::PathBuf;

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "SENSOR_MONITOR_DB";

/// 模型工件路径环境变量
pub const MODEL_PATH_ENV: &str = "SENSOR_MONITOR_MODEL";

const DATA_DIR_NAME: &str = "sensor-monitor";
const DB_FILE_NAME: &str = "sensor_monitor.db";
const MODEL_FILE_NAME: &str = "risk_model.json";

/// 获取默认数据库路径
///
/// # 返回
/// - 环境变量 SENSOR_MONITOR_DB 指定时原样返回
/// - 否则落在 用户数据目录/sensor-monitor/sensor_monitor.db
/// - 拿不到数据目录时回退 ./sensor_monitor.db
pub fn default_db_path() -> String {
    default_data_file(DB_PATH_ENV, DB_FILE_NAME)
}

/// 获取默认模型工件路径
pub fn default_model_path() -> String {
    default_data_file(MODEL_PATH_ENV, MODEL_FILE_NAME)
}

fn default_data_file(env_key: &str, file_name: &str) -> String {
    // 允许通过环境变量显式指定路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var(env_key) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    // 先给一个默认回退值，后续如果能拿到 data_dir 再覆盖。
    let mut path = PathBuf::from(format!("./{}", file_name));

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join(DATA_DIR_NAME);
        // 确保目录存在
        std::fs::create_dir_all(&dir).ok();
        path = dir.join(file_name);
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_db_path() {
        let path = default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }

    #[test]
    fn test_default_model_path() {
        let path = default_model_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".json"));
    }
}
