// ==========================================
// 工业传感器监测系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、业务规则接口
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod dataset;
pub mod failure;
pub mod machine;
pub mod reading;
pub mod sensor;
pub mod types;

// 重导出核心类型
pub use dataset::SyntheticRecord;
pub use failure::FailureEvent;
pub use machine::Machine;
pub use reading::{ReadingDetail, SensorReading};
pub use sensor::Sensor;
pub use types::{
    FailureEventStatus, FailureKind, MachineQuality, MachineStatus, QualityGrade, RiskLevel,
    SensorStatus, FAILURE_KINDS,
};
