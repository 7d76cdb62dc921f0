// ==========================================
// 工业传感器监测系统 - 数据库表结构
// ==========================================
// 职责: 幂等建表(CREATE TABLE IF NOT EXISTS),应用启动时调用
// 红线: 级联链 machines -> sensors -> sensor_readings 依赖外键开启
// ==========================================

use rusqlite::Connection;

/// 全部表与索引的 DDL
///
/// # 说明
/// - 时间列存储 `YYYY-MM-DD HH:MM:SS` 文本,字典序即时间序
/// - failure_events.sensor_id 可空,传感器删除后置 NULL
const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS machines (
    machine_id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    quality TEXT DEFAULT 'HIGH' NOT NULL,
    model TEXT,
    status TEXT DEFAULT 'ACTIVE' NOT NULL
);

CREATE TABLE IF NOT EXISTS sensors (
    sensor_id INTEGER PRIMARY KEY AUTOINCREMENT,
    sensor_type TEXT NOT NULL,
    unit TEXT NOT NULL,
    status TEXT DEFAULT 'ACTIVE' NOT NULL,
    min_limit REAL,
    max_limit REAL,
    machine_id INTEGER NOT NULL,
    FOREIGN KEY (machine_id) REFERENCES machines(machine_id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS sensor_readings (
    reading_id INTEGER PRIMARY KEY AUTOINCREMENT,
    sensor_id INTEGER NOT NULL,
    recorded_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP NOT NULL,
    value REAL NOT NULL,
    FOREIGN KEY (sensor_id) REFERENCES sensors(sensor_id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_readings_sensor_time
    ON sensor_readings(sensor_id, recorded_at);

CREATE TABLE IF NOT EXISTS failure_events (
    failure_id INTEGER PRIMARY KEY AUTOINCREMENT,
    machine_id INTEGER NOT NULL,
    sensor_id INTEGER,
    description TEXT NOT NULL,
    severity TEXT NOT NULL,
    occurred_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP NOT NULL,
    status TEXT DEFAULT 'OPEN' NOT NULL,
    FOREIGN KEY (machine_id) REFERENCES machines(machine_id) ON DELETE CASCADE,
    FOREIGN KEY (sensor_id) REFERENCES sensors(sensor_id) ON DELETE SET NULL
);

CREATE TABLE IF NOT EXISTS config_kv (
    scope_id TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    PRIMARY KEY (scope_id, key)
);
"#;

/// 幂等建表
///
/// # 参数
/// - conn: 已应用统一 PRAGMA 的连接
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_sqlite_connection;

    #[test]
    fn test_ensure_schema_creates_all_tables() {
        let conn = open_sqlite_connection(":memory:").unwrap();
        ensure_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN \
                 ('machines','sensors','sensor_readings','failure_events','config_kv')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 5);
    }

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let conn = open_sqlite_connection(":memory:").unwrap();
        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();
    }

    #[test]
    fn test_cascade_chain_is_declared() {
        let conn = open_sqlite_connection(":memory:").unwrap();
        ensure_schema(&conn).unwrap();

        conn.execute(
            "INSERT INTO machines (name, quality, model, status) VALUES ('M', 'HIGH', NULL, 'ACTIVE')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO sensors (sensor_type, unit, status, min_limit, max_limit, machine_id) \
             VALUES ('T', 'C', 'ACTIVE', 0.0, 100.0, 1)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO sensor_readings (sensor_id, recorded_at, value) \
             VALUES (1, '2024-05-01 08:00:00', 42.0)",
            [],
        )
        .unwrap();

        conn.execute("DELETE FROM machines WHERE machine_id = 1", [])
            .unwrap();

        let sensors: i64 = conn
            .query_row("SELECT COUNT(*) FROM sensors", [], |row| row.get(0))
            .unwrap();
        let readings: i64 = conn
            .query_row("SELECT COUNT(*) FROM sensor_readings", [], |row| row.get(0))
            .unwrap();
        assert_eq!(sensors, 0);
        assert_eq!(readings, 0);
    }
}
