// ==========================================
// 工业传感器监测系统 - 机器领域模型
// ==========================================
// 用途: 工厂机器登记信息,传感器的归属实体
// 对齐: machines 表
// ==========================================

use crate::domain::types::{MachineQuality, MachineStatus};
use serde::{Deserialize, Serialize};

// ==========================================
// Machine - 机器
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Machine {
    pub machine_id: i64,              // 主键(自增,插入前为 0)
    pub name: String,                 // 机器名称
    pub quality: MachineQuality,      // 设备质量档位
    pub model: Option<String>,        // 型号
    pub status: MachineStatus,        // 机器状态
}

impl Machine {
    /// 构造一台待入库的机器(machine_id 由数据库分配)
    pub fn new(name: impl Into<String>, quality: MachineQuality, model: Option<String>) -> Self {
        Machine {
            machine_id: 0,
            name: name.into(),
            quality,
            model,
            status: MachineStatus::Active,
        }
    }
}
