// ==========================================
// 工业传感器监测系统 - 传感器领域模型
// ==========================================
// 用途: 挂载在机器上的测点,带可选的正常区间上下限
// 对齐: sensors 表
// ==========================================

use crate::domain::types::SensorStatus;
use serde::{Deserialize, Serialize};

// ==========================================
// Sensor - 传感器
// ==========================================
// 说明: min_limit/max_limit 为可选,两者齐备时才能做越限判定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sensor {
    pub sensor_id: i64,               // 主键(自增,插入前为 0)
    pub sensor_type: String,          // 传感器类型(自由文本,如 "Temperatura")
    pub unit: String,                 // 计量单位
    pub status: SensorStatus,         // 传感器状态
    pub min_limit: Option<f64>,       // 正常区间下限
    pub max_limit: Option<f64>,       // 正常区间上限
    pub machine_id: i64,              // 所属机器(FK)
}

impl Sensor {
    /// 构造一个待入库的传感器(sensor_id 由数据库分配)
    pub fn new(
        sensor_type: impl Into<String>,
        unit: impl Into<String>,
        machine_id: i64,
        min_limit: Option<f64>,
        max_limit: Option<f64>,
    ) -> Self {
        Sensor {
            sensor_id: 0,
            sensor_type: sensor_type.into(),
            unit: unit.into(),
            status: SensorStatus::Active,
            min_limit,
            max_limit,
            machine_id,
        }
    }

    /// 上下限是否齐备(齐备才能参与越限标注)
    pub fn has_limits(&self) -> bool {
        self.min_limit.is_some() && self.max_limit.is_some()
    }
}
