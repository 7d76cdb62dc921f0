// ==========================================
// 工业传感器监测系统 - 合成数据集领域模型
// ==========================================
// 用途: AI4I 风格的模拟传感器数据行,生成器/CSV/规则模型共用
// 对齐: 数据集固定 10 列(见 simulation::csv)
// ==========================================

use crate::domain::types::{FailureKind, QualityGrade};
use serde::{Deserialize, Serialize};

// ==========================================
// SyntheticRecord - 合成数据行
// ==========================================
// 一行对应一台模拟设备在一个采样点的全部传感器通道
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticRecord {
    pub udi: u32,                     // 唯一行号(从 1 开始)
    pub product_id: String,           // 产品号: 质量等级字母 + 5 位零填充行号
    pub product_class: QualityGrade,  // 产品质量等级(产品号前缀)
    pub air_temp_k: f64,              // 空气温度 [K]
    pub process_temp_k: f64,          // 工艺温度 [K]
    pub rotation_rpm: f64,            // 转速 [rpm]
    pub torque_nm: f64,               // 扭矩 [Nm]
    pub tool_wear_min: u32,           // 刀具磨损 [min]
    pub failed: bool,                 // 是否故障
    pub failure_kind: FailureKind,    // 故障类型
}

impl SyntheticRecord {
    /// 按质量等级与行号拼出产品号(如 `M00042`)
    pub fn format_product_id(grade: QualityGrade, udi: u32) -> String {
        format!("{}{:05}", grade.code(), udi)
    }
}
