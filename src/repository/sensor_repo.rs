// ==========================================
// 工业传感器监测系统 - 传感器数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::sensor::Sensor;
use crate::domain::types::SensorStatus;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// SensorRepository - 传感器仓储
// ==========================================
/// 传感器仓储
/// 职责: 管理 sensors 表的数据访问
pub struct SensorRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SensorRepository {
    /// 创建新的 SensorRepository 实例
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

    /// 插入传感器
    ///
    /// # 返回
    /// - Ok(i64): 数据库分配的 sensor_id
    /// - Err(ForeignKeyViolation): 机器不存在
    /// - Err(ValidationError): 上下限倒挂
    pub fn insert(&self, sensor: &Sensor) -> RepositoryResult<i64> {
        if let (Some(lo), Some(hi)) = (sensor.min_limit, sensor.max_limit) {
            if lo > hi {
                return Err(RepositoryError::ValidationError(format!(
                    "传感器上下限倒挂: min={} max={}",
                    lo, hi
                )));
            }
        }

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO sensors (sensor_type, unit, status, min_limit, max_limit, machine_id)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                sensor.sensor_type,
                sensor.unit,
                sensor.status.to_db_str(),
                sensor.min_limit,
                sensor.max_limit,
                sensor.machine_id,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 按主键查询传感器
    pub fn find_by_id(&self, sensor_id: i64) -> RepositoryResult<Option<Sensor>> {
        let conn = self.get_conn()?;
        let result = conn.query_row(
            r#"
            SELECT sensor_id, sensor_type, unit, status, min_limit, max_limit, machine_id
            FROM sensors
            WHERE sensor_id = ?1
            "#,
            params![sensor_id],
            Self::map_row,
        );

        match result {
            Ok(sensor) => Ok(Some(sensor)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// 查询全部传感器(按主键升序)
    pub fn list_all(&self) -> RepositoryResult<Vec<Sensor>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT sensor_id, sensor_type, unit, status, min_limit, max_limit, machine_id
            FROM sensors
            ORDER BY sensor_id ASC
            "#,
        )?;

        let sensors = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(sensors)
    }

    /// 查询某台机器下的全部传感器
    pub fn list_by_machine(&self, machine_id: i64) -> RepositoryResult<Vec<Sensor>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT sensor_id, sensor_type, unit, status, min_limit, max_limit, machine_id
            FROM sensors
            WHERE machine_id = ?1
            ORDER BY sensor_id ASC
            "#,
        )?;

        let sensors = stmt
            .query_map(params![machine_id], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(sensors)
    }

    /// 删除传感器(级联删除其读数)
    pub fn delete(&self, sensor_id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM sensors WHERE sensor_id = ?1",
            params![sensor_id],
        )?;
        Ok(affected > 0)
    }

    /// 传感器数量
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM sensors", [], |row| row.get(0))?;
        Ok(count)
    }

    /// 行映射
    fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Sensor> {
        Ok(Sensor {
            sensor_id: row.get(0)?,
            sensor_type: row.get(1)?,
            unit: row.get(2)?,
            status: SensorStatus::from_str(&row.get::<_, String>(3)?),
            min_limit: row.get(4)?,
            max_limit: row.get(5)?,
            machine_id: row.get(6)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::machine::Machine;
    use crate::domain::types::MachineQuality;
    use crate::repository::machine_repo::MachineRepository;
    use crate::repository::schema::ensure_schema;

    fn setup_test_db() -> Arc<Mutex<Connection>> {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        ensure_schema(&conn).unwrap();
        Arc::new(Mutex::new(conn))
    }

    fn insert_machine(conn: &Arc<Mutex<Connection>>) -> i64 {
        let repo = MachineRepository::from_connection(Arc::clone(conn));
        repo.insert(&Machine::new("Maquina A", MachineQuality::High, None))
            .unwrap()
    }

    #[test]
    fn test_insert_and_find_by_id() {
        let conn = setup_test_db();
        let machine_id = insert_machine(&conn);
        let repo = SensorRepository::from_connection(conn);

        let sensor = Sensor::new("Temperatura", "C", machine_id, Some(0.0), Some(100.0));
        let id = repo.insert(&sensor).unwrap();

        let found = repo.find_by_id(id).unwrap().unwrap();
        assert_eq!(found.sensor_type, "Temperatura");
        assert_eq!(found.unit, "C");
        assert_eq!(found.min_limit, Some(0.0));
        assert_eq!(found.max_limit, Some(100.0));
        assert_eq!(found.machine_id, machine_id);
        assert_eq!(found.status, SensorStatus::Active);
    }

    #[test]
    fn test_insert_without_machine_is_fk_violation() {
        let repo = SensorRepository::from_connection(setup_test_db());
        let sensor = Sensor::new("Temperatura", "C", 999, None, None);
        let result = repo.insert(&sensor);
        assert!(matches!(
            result,
            Err(RepositoryError::ForeignKeyViolation(_))
        ));
    }

    #[test]
    fn test_insert_rejects_inverted_limits() {
        let conn = setup_test_db();
        let machine_id = insert_machine(&conn);
        let repo = SensorRepository::from_connection(conn);

        let sensor = Sensor::new("Pressão", "bar", machine_id, Some(10.0), Some(1.0));
        let result = repo.insert(&sensor);
        assert!(matches!(result, Err(RepositoryError::ValidationError(_))));
    }

    #[test]
    fn test_list_by_machine_filters() {
        let conn = setup_test_db();
        let m1 = insert_machine(&conn);
        let m2 = insert_machine(&conn);
        let repo = SensorRepository::from_connection(conn);

        repo.insert(&Sensor::new("Temperatura", "C", m1, None, None))
            .unwrap();
        repo.insert(&Sensor::new("Vibração", "mm/s", m1, None, None))
            .unwrap();
        repo.insert(&Sensor::new("Pressão", "bar", m2, None, None))
            .unwrap();

        assert_eq!(repo.list_by_machine(m1).unwrap().len(), 2);
        assert_eq!(repo.list_by_machine(m2).unwrap().len(), 1);
        assert_eq!(repo.list_all().unwrap().len(), 3);
    }
}
