// ==========================================
// 工业传感器监测系统 - 模型告警登记
// ==========================================
// 职责: 打分概率达到配置阈值时登记故障事件
// 说明: 告警出口为结构化日志 + failure_events 落库,
//       外部消息通道不在本系统范围内
// ==========================================

use crate::domain::failure::FailureEvent;
use crate::engine::error::EngineResult;
use crate::engine::model::RiskScore;
use crate::repository::failure_repo::FailureEventRepository;
use std::sync::Arc;
use tracing::{info, warn};

// ==========================================
// AlertService - 告警服务
// ==========================================
pub struct AlertService {
    failure_repo: Arc<FailureEventRepository>,
}

impl AlertService {
    pub fn new(failure_repo: Arc<FailureEventRepository>) -> Self {
        Self { failure_repo }
    }

    /// 概率达到阈值时登记故障事件
    ///
    /// # 参数
    /// - score: 打分结果
    /// - threshold: 告警概率阈值(来自配置)
    ///
    /// # 返回
    /// - Some(failure_id): 已登记
    /// - None: 未达阈值,不登记
    ///
    /// # 说明
    /// - 事件时间取读数时间,严重度取概率分档
    pub fn register_if_crossed(
        &self,
        score: &RiskScore,
        threshold: f64,
    ) -> EngineResult<Option<i64>> {
        if score.probability < threshold {
            info!(
                reading_id = score.reading_id,
                probability = score.probability,
                threshold,
                "概率未达告警阈值"
            );
            return Ok(None);
        }

        let description = format!(
            "模型告警: 故障概率 {:.3} >= 阈值 {:.3}; 读数 {:.3} {} ({} #{}) @ {}",
            score.probability,
            threshold,
            score.value,
            score.unit,
            score.sensor_type,
            score.sensor_id,
            score.recorded_at.format("%Y-%m-%d %H:%M:%S"),
        );

        let event = FailureEvent::new(
            score.machine_id,
            Some(score.sensor_id),
            description,
            score.severity,
            score.recorded_at,
        );
        let failure_id = self.failure_repo.insert(&event)?;

        warn!(
            failure_id,
            machine_id = score.machine_id,
            sensor_id = score.sensor_id,
            probability = score.probability,
            severity = %score.severity,
            "已登记模型告警故障事件"
        );
        Ok(Some(failure_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::configure_sqlite_connection;
    use crate::domain::machine::Machine;
    use crate::domain::sensor::Sensor;
    use crate::domain::types::{MachineQuality, RiskLevel};
    use crate::engine::features::NUM_FEATURES;
    use crate::repository::machine_repo::MachineRepository;
    use crate::repository::schema::ensure_schema;
    use crate::repository::sensor_repo::SensorRepository;
    use chrono::NaiveDate;
    use rusqlite::Connection;
    use std::sync::Mutex;

    fn setup() -> (Arc<FailureEventRepository>, i64, i64) {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        ensure_schema(&conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));

        let machines = MachineRepository::from_connection(conn.clone());
        let machine_id = machines
            .insert(&Machine::new("Compressor", MachineQuality::Medium, None))
            .unwrap();
        let sensors = SensorRepository::from_connection(conn.clone());
        let sensor_id = sensors
            .insert(&Sensor::new("Pressao", "bar", machine_id, Some(1.0), Some(9.0)))
            .unwrap();

        (
            Arc::new(FailureEventRepository::from_connection(conn)),
            machine_id,
            sensor_id,
        )
    }

    fn score(machine_id: i64, sensor_id: i64, probability: f64) -> RiskScore {
        RiskScore {
            reading_id: 1,
            sensor_id,
            machine_id,
            machine_name: "Compressor".to_string(),
            sensor_type: "Pressao".to_string(),
            unit: "bar".to_string(),
            value: 11.4,
            recorded_at: NaiveDate::from_ymd_opt(2024, 6, 2)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            features: [0.0; NUM_FEATURES],
            probability,
            predicted_label: usize::from(probability >= 0.5),
            severity: RiskLevel::from_probability(probability),
            out_of_range: true,
        }
    }

    #[test]
    fn test_below_threshold_registers_nothing() {
        let (failures, machine_id, sensor_id) = setup();
        let alerts = AlertService::new(failures.clone());

        let result = alerts
            .register_if_crossed(&score(machine_id, sensor_id, 0.4), 0.5)
            .unwrap();
        assert!(result.is_none());
        assert_eq!(failures.count().unwrap(), 0);
    }

    #[test]
    fn test_crossing_threshold_registers_event() {
        let (failures, machine_id, sensor_id) = setup();
        let alerts = AlertService::new(failures.clone());

        let failure_id = alerts
            .register_if_crossed(&score(machine_id, sensor_id, 0.85), 0.5)
            .unwrap()
            .unwrap();
        assert!(failure_id > 0);

        let events = failures.list_by_machine(machine_id).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].severity, RiskLevel::High);
        assert_eq!(events[0].sensor_id, Some(sensor_id));
        assert!(events[0].description.contains("0.850"));
    }

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        let (failures, machine_id, sensor_id) = setup();
        let alerts = AlertService::new(failures.clone());

        let result = alerts
            .register_if_crossed(&score(machine_id, sensor_id, 0.5), 0.5)
            .unwrap();
        assert!(result.is_some());
        // 0.5 落在中档
        let events = failures.list_by_machine(machine_id).unwrap();
        assert_eq!(events[0].severity, RiskLevel::Medium);
    }
}
