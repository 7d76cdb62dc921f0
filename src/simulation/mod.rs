// ==========================================
// 工业传感器监测系统 - 模拟数据层
// ==========================================
// 职责: 确定性数据集生成、读数抖动模拟、数据集 CSV 读写
// 红线: 所有随机路径必须可由种子完全复现
// ==========================================

pub mod csv;
pub mod dataset;
pub mod error;
pub mod reading_sim;

// 重导出核心接口
pub use csv::{read_dataset, write_dataset, DATASET_HEADERS};
pub use dataset::{generate_dataset, summarize, DatasetSummary};
pub use error::{ImportError, ImportResult};
pub use reading_sim::{monitor_tick_record, simulate_band_values};
