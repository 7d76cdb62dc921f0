// ==========================================
// 工业传感器监测系统 - 读数领域模型
// ==========================================
// 用途: 传感器的单次采样值,以及联查机器/传感器的明细行
// 对齐: sensor_readings 表与 fetch_latest_details 联查结果
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ==========================================
// SensorReading - 传感器读数
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorReading {
    pub reading_id: i64,              // 主键(自增,插入前为 0)
    pub sensor_id: i64,               // 所属传感器(FK)
    pub recorded_at: NaiveDateTime,   // 采样时间(本地时间,秒精度)
    pub value: f64,                   // 采样值
}

impl SensorReading {
    pub fn new(sensor_id: i64, recorded_at: NaiveDateTime, value: f64) -> Self {
        SensorReading {
            reading_id: 0,
            sensor_id,
            recorded_at,
            value,
        }
    }
}

// ==========================================
// ReadingDetail - 读数明细行
// ==========================================
// 联查 sensor_readings × sensors × machines 的一行,
// 特征推导与打分都以它为输入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingDetail {
    pub reading_id: i64,              // 读数主键
    pub recorded_at: NaiveDateTime,   // 采样时间
    pub value: f64,                   // 采样值
    pub sensor_type: String,          // 传感器类型
    pub unit: String,                 // 计量单位
    pub min_limit: Option<f64>,       // 正常区间下限
    pub max_limit: Option<f64>,       // 正常区间上限
    pub sensor_id: i64,               // 传感器主键
    pub machine_id: i64,              // 机器主键
    pub machine_name: String,         // 机器名称
}

impl ReadingDetail {
    /// 越限标注: 上下限齐备且值落在区间外时为 true
    ///
    /// # 说明
    /// - 任一界限缺失时视为正常(无法判定则不标注)
    pub fn is_out_of_range(&self) -> bool {
        match (self.min_limit, self.max_limit) {
            (Some(lo), Some(hi)) => self.value < lo || self.value > hi,
            _ => false,
        }
    }
}
