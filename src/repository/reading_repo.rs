// ==========================================
// 工业传感器监测系统 - 读数数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 说明: 训练/打分用的联查在此层完成,特征推导在 engine 层
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::reading::{ReadingDetail, SensorReading};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

/// 训练数据单次拉取上限(防止全表加载失控)
pub const TRAINING_FETCH_LIMIT: usize = 10_000;

// ==========================================
// ReadingRepository - 读数仓储
// ==========================================
/// 读数仓储
/// 职责: 管理 sensor_readings 表的数据访问与明细联查
pub struct ReadingRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ReadingRepository {
    /// 创建新的 ReadingRepository 实例
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

    /// 插入单条读数
    ///
    /// # 返回
    /// - Ok(i64): 数据库分配的 reading_id
    pub fn insert(&self, reading: &SensorReading) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO sensor_readings (sensor_id, recorded_at, value)
            VALUES (?1, ?2, ?3)
            "#,
            params![
                reading.sensor_id,
                reading.recorded_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                reading.value,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 批量插入读数(单事务)
    ///
    /// # 返回
    /// - Ok(usize): 成功插入的记录数
    pub fn batch_insert(&self, readings: &[SensorReading]) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let tx = conn.unchecked_transaction()?;

        let mut count = 0;
        for reading in readings {
            tx.execute(
                r#"
                INSERT INTO sensor_readings (sensor_id, recorded_at, value)
                VALUES (?1, ?2, ?3)
                "#,
                params![
                    reading.sensor_id,
                    reading.recorded_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    reading.value,
                ],
            )?;
            count += 1;
        }

        tx.commit()?;
        Ok(count)
    }

    /// 联查最近的读数明细(时间倒序)
    ///
    /// # 参数
    /// - limit: 返回行数上限
    ///
    /// # 说明
    /// - 同一秒内的多条读数按 reading_id 倒序决出先后
    pub fn fetch_latest_details(&self, limit: usize) -> RepositoryResult<Vec<ReadingDetail>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT r.reading_id, r.recorded_at, r.value,
                   s.sensor_type, s.unit, s.min_limit, s.max_limit,
                   s.sensor_id, m.machine_id, m.name
            FROM sensor_readings r
            JOIN sensors s ON r.sensor_id = s.sensor_id
            JOIN machines m ON s.machine_id = m.machine_id
            ORDER BY r.recorded_at DESC, r.reading_id DESC
            LIMIT ?1
            "#,
        )?;

        let details = stmt
            .query_map(params![limit as i64], Self::map_detail_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(details)
    }

    /// 训练数据联查(上限 TRAINING_FETCH_LIMIT)
    ///
    /// # 说明
    /// - 返回最近的一批明细,特征推导前由 engine 层重排为时间升序
    pub fn fetch_details_for_training(&self) -> RepositoryResult<Vec<ReadingDetail>> {
        self.fetch_latest_details(TRAINING_FETCH_LIMIT)
    }

    /// 最新一条读数明细
    pub fn latest_detail(&self) -> RepositoryResult<Option<ReadingDetail>> {
        Ok(self.fetch_latest_details(1)?.into_iter().next())
    }

    /// 取某传感器截至指定读数(含)的最近 window 个值,按时间升序返回
    ///
    /// # 参数
    /// - sensor_id: 传感器主键
    /// - upto_at/upto_reading_id: 截止读数的时间与主键(含该条)
    /// - window: 窗口大小
    ///
    /// # 用途
    /// - 打分时重建滚动均值/标准差窗口
    pub fn fetch_recent_values(
        &self,
        sensor_id: i64,
        upto_at: NaiveDateTime,
        upto_reading_id: i64,
        window: usize,
    ) -> RepositoryResult<Vec<f64>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT value
            FROM sensor_readings
            WHERE sensor_id = ?1
              AND (recorded_at < ?2 OR (recorded_at = ?2 AND reading_id <= ?3))
            ORDER BY recorded_at DESC, reading_id DESC
            LIMIT ?4
            "#,
        )?;

        let mut values = stmt
            .query_map(
                params![
                    sensor_id,
                    upto_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    upto_reading_id,
                    window as i64,
                ],
                |row| row.get::<_, f64>(0),
            )?
            .collect::<SqliteResult<Vec<_>>>()?;
        values.reverse();
        Ok(values)
    }

    /// 清空全部读数
    ///
    /// # 返回
    /// - Ok(usize): 删除的记录数
    pub fn clear_all(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM sensor_readings", [])?;
        Ok(affected)
    }

    /// 读数总量
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM sensor_readings", [], |row| row.get(0))?;
        Ok(count)
    }

    /// 明细行映射
    fn map_detail_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ReadingDetail> {
        Ok(ReadingDetail {
            reading_id: row.get(0)?,
            recorded_at: NaiveDateTime::parse_from_str(
                &row.get::<_, String>(1)?,
                "%Y-%m-%d %H:%M:%S",
            )
            .unwrap_or_else(|_| NaiveDateTime::default()),
            value: row.get(2)?,
            sensor_type: row.get(3)?,
            unit: row.get(4)?,
            min_limit: row.get(5)?,
            max_limit: row.get(6)?,
            sensor_id: row.get(7)?,
            machine_id: row.get(8)?,
            machine_name: row.get(9)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::machine::Machine;
    use crate::domain::sensor::Sensor;
    use crate::domain::types::MachineQuality;
    use crate::repository::machine_repo::MachineRepository;
    use crate::repository::schema::ensure_schema;
    use crate::repository::sensor_repo::SensorRepository;
    use chrono::NaiveDate;

    fn setup_test_db() -> Arc<Mutex<Connection>> {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        ensure_schema(&conn).unwrap();
        Arc::new(Mutex::new(conn))
    }

    fn seed_sensor(conn: &Arc<Mutex<Connection>>) -> i64 {
        let machine_repo = MachineRepository::from_connection(Arc::clone(conn));
        let machine_id = machine_repo
            .insert(&Machine::new("Maquina A", MachineQuality::High, None))
            .unwrap();
        let sensor_repo = SensorRepository::from_connection(Arc::clone(conn));
        sensor_repo
            .insert(&Sensor::new(
                "Temperatura",
                "C",
                machine_id,
                Some(0.0),
                Some(100.0),
            ))
            .unwrap()
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_insert_and_latest_detail() {
        let conn = setup_test_db();
        let sensor_id = seed_sensor(&conn);
        let repo = ReadingRepository::from_connection(conn);

        repo.insert(&SensorReading::new(sensor_id, at(8, 0, 0), 42.0))
            .unwrap();
        repo.insert(&SensorReading::new(sensor_id, at(8, 0, 5), 55.5))
            .unwrap();

        let latest = repo.latest_detail().unwrap().unwrap();
        assert_eq!(latest.value, 55.5);
        assert_eq!(latest.sensor_type, "Temperatura");
        assert_eq!(latest.machine_name, "Maquina A");
        assert_eq!(latest.min_limit, Some(0.0));
    }

    #[test]
    fn test_latest_details_tie_break_by_reading_id() {
        let conn = setup_test_db();
        let sensor_id = seed_sensor(&conn);
        let repo = ReadingRepository::from_connection(conn);

        // 同一秒三条,主键大的视为更新
        for v in [1.0, 2.0, 3.0] {
            repo.insert(&SensorReading::new(sensor_id, at(8, 0, 0), v))
                .unwrap();
        }

        let details = repo.fetch_latest_details(3).unwrap();
        assert_eq!(details[0].value, 3.0);
        assert_eq!(details[1].value, 2.0);
        assert_eq!(details[2].value, 1.0);
    }

    #[test]
    fn test_batch_insert_counts() {
        let conn = setup_test_db();
        let sensor_id = seed_sensor(&conn);
        let repo = ReadingRepository::from_connection(conn);

        let readings: Vec<SensorReading> = (0..10)
            .map(|i| SensorReading::new(sensor_id, at(8, 0, i), i as f64))
            .collect();
        assert_eq!(repo.batch_insert(&readings).unwrap(), 10);
        assert_eq!(repo.count().unwrap(), 10);
    }

    #[test]
    fn test_fetch_recent_values_window_ascending() {
        let conn = setup_test_db();
        let sensor_id = seed_sensor(&conn);
        let repo = ReadingRepository::from_connection(conn);

        let mut last_id = 0;
        for i in 0..7u32 {
            last_id = repo
                .insert(&SensorReading::new(sensor_id, at(8, 0, i), i as f64))
                .unwrap();
        }

        let values = repo
            .fetch_recent_values(sensor_id, at(8, 0, 6), last_id, 5)
            .unwrap();
        assert_eq!(values, vec![2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_fetch_recent_values_short_history() {
        let conn = setup_test_db();
        let sensor_id = seed_sensor(&conn);
        let repo = ReadingRepository::from_connection(conn);

        let id = repo
            .insert(&SensorReading::new(sensor_id, at(8, 0, 0), 42.0))
            .unwrap();
        let values = repo.fetch_recent_values(sensor_id, at(8, 0, 0), id, 5).unwrap();
        assert_eq!(values, vec![42.0]);
    }

    #[test]
    fn test_clear_all() {
        let conn = setup_test_db();
        let sensor_id = seed_sensor(&conn);
        let repo = ReadingRepository::from_connection(conn);

        repo.insert(&SensorReading::new(sensor_id, at(8, 0, 0), 1.0))
            .unwrap();
        repo.insert(&SensorReading::new(sensor_id, at(8, 0, 1), 2.0))
            .unwrap();

        assert_eq!(repo.clear_all().unwrap(), 2);
        assert_eq!(repo.count().unwrap(), 0);
        assert!(repo.latest_detail().unwrap().is_none());
    }
}
