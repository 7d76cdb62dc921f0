// ==========================================
// 工业传感器监测系统 - 故障事件数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::failure::FailureEvent;
use crate::domain::types::{FailureEventStatus, RiskLevel};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// FailureEventRepository - 故障事件仓储
// ==========================================
/// 故障事件仓储
/// 职责: 管理 failure_events 表的数据访问
pub struct FailureEventRepository {
    conn: Arc<Mutex<Connection>>,
}

impl FailureEventRepository {
    /// 创建新的 FailureEventRepository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入故障事件
    ///
    /// # 返回
    /// - Ok(i64): 数据库分配的 failure_id
    pub fn insert(&self, event: &FailureEvent) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO failure_events
                (machine_id, sensor_id, description, severity, occurred_at, status)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                event.machine_id,
                event.sensor_id,
                event.description,
                event.severity.to_db_str(),
                event.occurred_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                event.status.to_db_str(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 最近的故障事件(时间倒序)
    pub fn list_recent(&self, limit: usize) -> RepositoryResult<Vec<FailureEvent>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT failure_id, machine_id, sensor_id, description, severity, occurred_at, status
            FROM failure_events
            ORDER BY occurred_at DESC, failure_id DESC
            LIMIT ?1
            "#,
        )?;

        let events = stmt
            .query_map(params![limit as i64], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(events)
    }

    /// 某台机器的故障事件(时间倒序)
    pub fn list_by_machine(&self, machine_id: i64) -> RepositoryResult<Vec<FailureEvent>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT failure_id, machine_id, sensor_id, description, severity, occurred_at, status
            FROM failure_events
            WHERE machine_id = ?1
            ORDER BY occurred_at DESC, failure_id DESC
            "#,
        )?;

        let events = stmt
            .query_map(params![machine_id], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(events)
    }

    /// 故障事件总量
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM failure_events", [], |row| row.get(0))?;
        Ok(count)
    }

    /// 行映射
    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<FailureEvent> {
        Ok(FailureEvent {
            failure_id: row.get(0)?,
            machine_id: row.get(1)?,
            sensor_id: row.get(2)?,
            description: row.get(3)?,
            severity: RiskLevel::from_str(&row.get::<_, String>(4)?),
            occurred_at: NaiveDateTime::parse_from_str(
                &row.get::<_, String>(5)?,
                "%Y-%m-%d %H:%M:%S",
            )
            .unwrap_or_else(|_| NaiveDateTime::default()),
            status: FailureEventStatus::from_str(&row.get::<_, String>(6)?),
        })
    }
}
