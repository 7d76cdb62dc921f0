// ==========================================
// 工业传感器监测系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection};
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取配置值，不存在时回退默认值
    pub fn get_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 写入配置值（UPSERT,SQLite 3.24.0+）
    pub fn set(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }

    /// 列出 global scope 全部配置,按键排序
    pub fn list_all(&self) -> Result<Vec<(String, String)>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt = conn
            .prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }

    /// 写入缺省配置,不覆盖已有值
    ///
    /// # 返回
    /// - usize: 实际新写入的配置项数量
    pub fn seed_defaults(&self) -> Result<usize, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut count = 0;
        for (key, value) in config_keys::DEFAULTS {
            let affected = conn.execute(
                "INSERT OR IGNORE INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)",
                params![key, value],
            )?;
            count += affected;
        }
        Ok(count)
    }

    // ===== 告警配置 =====

    /// 告警概率阈值（默认 0.5）
    pub fn get_probability_threshold(&self) -> Result<f64, Box<dyn Error>> {
        let value = self.get_or_default(config_keys::PROBABILITY_THRESHOLD, "0.5")?;
        Ok(value.parse::<f64>().unwrap_or(0.5))
    }

    // ===== 巡检配置 =====

    /// 巡检间隔秒数（默认 20）
    pub fn get_tick_interval_secs(&self) -> Result<u64, Box<dyn Error>> {
        let value = self.get_or_default(config_keys::TICK_INTERVAL_SECS, "20")?;
        Ok(value.parse::<u64>().unwrap_or(20))
    }

    /// 单轮巡检次数（默认 10）
    pub fn get_default_ticks(&self) -> Result<usize, Box<dyn Error>> {
        let value = self.get_or_default(config_keys::DEFAULT_TICKS, "10")?;
        Ok(value.parse::<usize>().unwrap_or(10))
    }

    // ===== 模拟配置 =====

    /// 单次模拟写入的读数条数（默认 10）
    pub fn get_default_simulate_count(&self) -> Result<usize, Box<dyn Error>> {
        let value = self.get_or_default(config_keys::SIMULATE_COUNT, "10")?;
        Ok(value.parse::<usize>().unwrap_or(10))
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 告警
    pub const PROBABILITY_THRESHOLD: &str = "alert/probability_threshold";

    // 巡检
    pub const TICK_INTERVAL_SECS: &str = "monitor/tick_interval_secs";
    pub const DEFAULT_TICKS: &str = "monitor/default_ticks";

    // 模拟
    pub const SIMULATE_COUNT: &str = "simulate/default_count";

    /// 缺省配置全集 (key, value)
    pub const DEFAULTS: [(&str, &str); 4] = [
        (PROBABILITY_THRESHOLD, "0.5"),
        (TICK_INTERVAL_SECS, "20"),
        (DEFAULT_TICKS, "10"),
        (SIMULATE_COUNT, "10"),
    ];
}
