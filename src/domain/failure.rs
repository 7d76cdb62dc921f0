// ==========================================
// 工业传感器监测系统 - 故障事件领域模型
// ==========================================
// 用途: 人工登记或模型/规则触发的故障告警记录
// 对齐: failure_events 表
// ==========================================

use crate::domain::types::{FailureEventStatus, RiskLevel};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// FailureEvent - 故障事件
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureEvent {
    pub failure_id: i64,                  // 主键(自增,插入前为 0)
    pub machine_id: i64,                  // 所属机器(FK)
    pub sensor_id: Option<i64>,           // 关联传感器(可空)
    pub description: String,              // 故障描述
    pub severity: RiskLevel,              // 严重度
    pub occurred_at: NaiveDateTime,       // 发生时间
    pub status: FailureEventStatus,       // 处理状态
}

impl FailureEvent {
    /// 构造一条待入库的故障事件(默认状态 Open)
    pub fn new(
        machine_id: i64,
        sensor_id: Option<i64>,
        description: impl Into<String>,
        severity: RiskLevel,
        occurred_at: NaiveDateTime,
    ) -> Self {
        FailureEvent {
            failure_id: 0,
            machine_id,
            sensor_id,
            description: description.into(),
            severity,
            occurred_at,
            status: FailureEventStatus::Open,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_new_failure_event_is_open() {
        let at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let event = FailureEvent::new(1, Some(2), "温度越限", RiskLevel::High, at);
        assert_eq!(event.status, FailureEventStatus::Open);
        assert_eq!(event.severity, RiskLevel::High);
        assert_eq!(event.sensor_id, Some(2));
    }
}
