// ==========================================
// 工业传感器监测系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite + 命令行
// 系统定位: 读数采集、故障风险预测与巡检告警
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 特征推导/训练/打分/巡检
pub mod engine;

// 模拟数据层 - 合成数据集与读数模拟
pub mod simulation;

// 配置层 - config_kv 与默认路径
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 命令行界面
pub mod cli;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{
    FailureEventStatus, FailureKind, MachineQuality, MachineStatus, QualityGrade, RiskLevel,
    SensorStatus,
};

// 领域实体
pub use domain::{FailureEvent, Machine, ReadingDetail, Sensor, SensorReading, SyntheticRecord};

// 引擎
pub use engine::{
    AlertService, MonitorService, RiskModel, RiskScore, RuleModel, ScoringEngine, TrainingEngine,
};

// 仓储
pub use repository::{
    FailureEventRepository, MachineRepository, ReadingRepository, SensorRepository,
};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "工业传感器监测系统";
