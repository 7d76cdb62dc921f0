// ==========================================
// 工业传感器监测系统 - 引擎层
// ==========================================
// 职责: 特征推导、模型训练/打分、规则告警与巡检
// 红线: Engine 不拼 SQL, 数据访问一律走仓储层
// ==========================================

pub mod alert;
pub mod error;
pub mod features;
pub mod forest;
pub mod metrics;
pub mod model;
pub mod monitor;
pub mod rules;
pub mod scaler;
pub mod split;
pub mod tree;

// 重导出核心引擎
pub use alert::AlertService;
pub use error::{EngineError, EngineResult};
pub use features::{
    derive_features, scoring_features, FeatureRow, TypeCodeBook, FEATURE_NAMES, NUM_FEATURES,
    ROLLING_WINDOW,
};
pub use forest::{RandomForest, RandomForestParams};
pub use metrics::{evaluate, ClassMetrics, EvaluationMetrics};
pub use model::{
    RiskModel, RiskScore, ScoringEngine, TrainReport, TrainingEngine, ARTIFACT_VERSION,
    CLASSIFICATION_THRESHOLD, TEST_RATIO,
};
pub use monitor::{MonitorParams, MonitorService, MonitorSummary, TickOutcome};
pub use rules::{RuleDistribution, RuleModel, RuleVerdict};
pub use scaler::StandardScaler;
pub use split::{stratified_split, SplitIndices};
