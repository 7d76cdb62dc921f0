// ==========================================
// 工业传感器监测系统 - 机器数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::machine::Machine;
use crate::domain::types::{MachineQuality, MachineStatus};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// MachineRepository - 机器仓储
// ==========================================
/// 机器仓储
/// 职责: 管理 machines 表的数据访问
pub struct MachineRepository {
    conn: Arc<Mutex<Connection>>,
}

impl MachineRepository {
    /// 创建新的 MachineRepository 实例
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

    /// 插入机器
    ///
    /// # 返回
    /// - Ok(i64): 数据库分配的 machine_id
    pub fn insert(&self, machine: &Machine) -> RepositoryResult<i64> {
        if machine.name.trim().is_empty() {
            return Err(RepositoryError::FieldValueError {
                field: "name".to_string(),
                message: "机器名称不能为空".to_string(),
            });
        }

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO machines (name, quality, model, status)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                machine.name,
                machine.quality.to_db_str(),
                machine.model,
                machine.status.to_db_str(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 按主键查询机器
    ///
    /// # 返回
    /// - Ok(Some(Machine)): 找到
    /// - Ok(None): 未找到
    pub fn find_by_id(&self, machine_id: i64) -> RepositoryResult<Option<Machine>> {
        let conn = self.get_conn()?;
        let result = conn.query_row(
            r#"
            SELECT machine_id, name, quality, model, status
            FROM machines
            WHERE machine_id = ?1
            "#,
            params![machine_id],
            Self::map_row,
        );

        match result {
            Ok(machine) => Ok(Some(machine)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询全部机器(按主键升序)
    pub fn list_all(&self) -> RepositoryResult<Vec<Machine>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT machine_id, name, quality, model, status
            FROM machines
            ORDER BY machine_id ASC
            "#,
        )?;

        let machines = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(machines)
    }

    /// 删除机器(级联删除其传感器与读数)
    ///
    /// # 返回
    /// - Ok(true): 删除了一条记录
    /// - Ok(false): 无此机器
    pub fn delete(&self, machine_id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM machines WHERE machine_id = ?1",
            params![machine_id],
        )?;
        Ok(affected > 0)
    }

    /// 机器数量
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM machines", [], |row| row.get(0))?;
        Ok(count)
    }

    /// 行映射
    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Machine> {
        Ok(Machine {
            machine_id: row.get(0)?,
            name: row.get(1)?,
            quality: MachineQuality::from_str(&row.get::<_, String>(2)?),
            model: row.get(3)?,
            status: MachineStatus::from_str(&row.get::<_, String>(4)?),
        })
    }
}
