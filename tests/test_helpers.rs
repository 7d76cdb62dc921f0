// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据生成等功能
// ==========================================

use rusqlite::Connection;
use std::error::Error;
use tempfile::NamedTempFile;

use sensor_monitor::db::open_sqlite_connection;
use sensor_monitor::domain::types::MachineQuality;
use sensor_monitor::domain::{Machine, Sensor};
use sensor_monitor::repository::{ensure_schema, MachineRepository, SensorRepository};

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时路径不是合法 UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    ensure_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开测试数据库连接（已应用统一 PRAGMA）
pub fn open_test_connection(db_path: &str) -> Result<Connection, Box<dyn Error>> {
    Ok(open_sqlite_connection(db_path)?)
}

/// 登记一台机器和一个带上下限的温度传感器
///
/// # 返回
/// - (machine_id, sensor_id)
pub fn seed_machine_with_sensor(db_path: &str) -> Result<(i64, i64), Box<dyn Error>> {
    let machines = MachineRepository::new(db_path)?;
    let sensors = SensorRepository::new(db_path)?;

    let machine_id = machines.insert(&Machine::new(
        "Torno CNC",
        MachineQuality::High,
        Some("TC-200".to_string()),
    ))?;
    let sensor_id = sensors.insert(&Sensor::new(
        "Temperatura",
        "C",
        machine_id,
        Some(0.0),
        Some(100.0),
    ))?;

    Ok((machine_id, sensor_id))
}
