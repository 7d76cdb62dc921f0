// ==========================================
// 工业传感器监测系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod failure_repo;
pub mod machine_repo;
pub mod reading_repo;
pub mod schema;
pub mod sensor_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use failure_repo::FailureEventRepository;
pub use machine_repo::MachineRepository;
pub use reading_repo::{ReadingRepository, TRAINING_FETCH_LIMIT};
pub use schema::ensure_schema;
pub use sensor_repo::SensorRepository;
