// ==========================================
// 工业传感器监测系统 - 风险模型训练与打分
// ==========================================
// 职责: 读数 -> 特征 -> 标准化 -> 随机森林的完整训练链,
//       以及模型工件的落盘/加载与单条读数打分
// 红线: 打分必须复用训练时持久化的编码表与标准化参数
// ==========================================

use crate::domain::reading::ReadingDetail;
use crate::domain::types::RiskLevel;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::features::{
    derive_features, scoring_features, TypeCodeBook, FEATURE_NAMES, NUM_FEATURES, ROLLING_WINDOW,
};
use crate::engine::forest::{RandomForest, RandomForestParams};
use crate::engine::metrics::{evaluate, EvaluationMetrics};
use crate::engine::scaler::StandardScaler;
use crate::engine::split::stratified_split;
use crate::repository::reading_repo::ReadingRepository;
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// 模型工件格式版本
pub const ARTIFACT_VERSION: u32 = 1;

/// 测试集占比
pub const TEST_RATIO: f64 = 0.2;

/// 判类阈值(评估用,告警阈值走配置)
pub const CLASSIFICATION_THRESHOLD: f64 = 0.5;

// ==========================================
// RiskModel - 模型工件
// ==========================================
/// 训练产物,JSON 落盘
///
/// # 说明
/// - code_book/scaler 随森林一并持久化,打分端只读不改
/// - schema_version 不匹配时拒绝加载
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskModel {
    pub schema_version: u32,           // 工件格式版本
    pub model_id: String,              // 本次训练的唯一标识
    pub trained_at: NaiveDateTime,     // 训练时间(本地)
    pub seed: u64,                     // 训练种子
    pub n_samples: usize,              // 训练用读数条数
    pub feature_names: Vec<String>,    // 特征列序
    pub code_book: TypeCodeBook,       // 传感器类型编码表
    pub scaler: StandardScaler,        // 标准化参数
    pub forest: RandomForest,          // 随机森林
}

/// 只读 schema_version 的探针
#[derive(Deserialize)]
struct VersionProbe {
    schema_version: u32,
}

impl RiskModel {
    /// 原子落盘: 先写 .tmp 再改名
    pub fn save(&self, path: &Path) -> EngineResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| EngineError::ArtifactIo {
                    path: parent.display().to_string(),
                    message: e.to_string(),
                })?;
            }
        }

        let json = serde_json::to_string(self).map_err(|e| EngineError::ArtifactFormat {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let tmp = path.with_extension("tmp");
        fs::write(&tmp, json).map_err(|e| EngineError::ArtifactIo {
            path: tmp.display().to_string(),
            message: e.to_string(),
        })?;
        fs::rename(&tmp, path).map_err(|e| EngineError::ArtifactIo {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        info!(path = %path.display(), model_id = %self.model_id, "模型工件已保存");
        Ok(())
    }

    /// 从磁盘加载并校验版本与特征维度
    pub fn load(path: &Path) -> EngineResult<Self> {
        if !path.exists() {
            return Err(EngineError::ModelNotFound(path.display().to_string()));
        }

        let text = fs::read_to_string(path).map_err(|e| EngineError::ArtifactIo {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let probe: VersionProbe =
            serde_json::from_str(&text).map_err(|e| EngineError::ArtifactFormat {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        if probe.schema_version != ARTIFACT_VERSION {
            return Err(EngineError::ArtifactVersion {
                expected: ARTIFACT_VERSION,
                actual: probe.schema_version,
            });
        }

        let model: RiskModel =
            serde_json::from_str(&text).map_err(|e| EngineError::ArtifactFormat {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        if model.feature_names.len() != NUM_FEATURES {
            return Err(EngineError::FeatureDimension {
                expected: NUM_FEATURES,
                actual: model.feature_names.len(),
            });
        }
        Ok(model)
    }
}

// ==========================================
// TrainReport - 训练报告
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct TrainReport {
    pub n_samples: usize,          // 总样本数
    pub n_train: usize,            // 训练集样本数
    pub n_test: usize,             // 测试集样本数
    pub n_positive: usize,         // 越限样本数
    pub stratified: bool,          // 是否有效分层(两类齐备)
    pub metrics: EvaluationMetrics, // 测试集指标
}

// ==========================================
// TrainingEngine - 训练引擎
// ==========================================
pub struct TrainingEngine {
    reading_repo: Arc<ReadingRepository>,
}

impl TrainingEngine {
    pub fn new(reading_repo: Arc<ReadingRepository>) -> Self {
        Self { reading_repo }
    }

    /// 执行一次完整训练
    ///
    /// # 参数
    /// - params: 森林超参数(含种子)
    ///
    /// # 返回
    /// - Ok(None): 库内没有可训练的读数
    /// - Ok(Some((model, report))): 模型与测试集报告
    pub fn train(
        &self,
        params: RandomForestParams,
    ) -> EngineResult<Option<(RiskModel, TrainReport)>> {
        let details = self.reading_repo.fetch_details_for_training()?;
        if details.is_empty() {
            warn!("没有读数可供训练");
            return Ok(None);
        }

        let (rows, code_book) = derive_features(&details);
        let labels: Vec<usize> = rows.iter().map(|r| r.label).collect();
        let raw: Vec<[f64; NUM_FEATURES]> = rows.iter().map(|r| r.features).collect();

        let n_positive = labels.iter().filter(|&&l| l == 1).count();
        let stratified = n_positive > 0 && n_positive < labels.len();
        if !stratified {
            warn!(
                n_samples = labels.len(),
                n_positive, "训练数据只有单一类别,退化为整体随机切分"
            );
        }

        let split = stratified_split(&labels, TEST_RATIO, params.seed);

        let train_raw: Vec<[f64; NUM_FEATURES]> =
            split.train.iter().map(|&i| raw[i]).collect();
        let train_labels: Vec<usize> = split.train.iter().map(|&i| labels[i]).collect();

        let scaler = StandardScaler::fit(&train_raw);
        let train_x = scaler.transform_batch(&train_raw);

        info!(
            n_samples = labels.len(),
            n_train = train_x.len(),
            n_test = split.test.len(),
            n_trees = params.n_trees,
            seed = params.seed,
            "开始训练随机森林"
        );
        let forest = RandomForest::fit(&train_x, &train_labels, params.clone());

        let test_labels: Vec<usize> = split.test.iter().map(|&i| labels[i]).collect();
        let test_x: Vec<[f64; NUM_FEATURES]> = split
            .test
            .iter()
            .map(|&i| scaler.transform(&raw[i]))
            .collect();
        let scores: Vec<f64> = test_x.iter().map(|x| forest.predict_proba(x)).collect();
        let preds: Vec<usize> = scores
            .iter()
            .map(|&p| usize::from(p >= CLASSIFICATION_THRESHOLD))
            .collect();
        let metrics = evaluate(&test_labels, &preds, &scores);

        let report = TrainReport {
            n_samples: labels.len(),
            n_train: split.train.len(),
            n_test: split.test.len(),
            n_positive,
            stratified,
            metrics,
        };

        let model = RiskModel {
            schema_version: ARTIFACT_VERSION,
            model_id: Uuid::new_v4().to_string(),
            trained_at: Local::now().naive_local(),
            seed: params.seed,
            n_samples: labels.len(),
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            code_book,
            scaler,
            forest,
        };

        info!(
            model_id = %model.model_id,
            accuracy = report.metrics.accuracy,
            "训练完成"
        );
        Ok(Some((model, report)))
    }
}

// ==========================================
// RiskScore - 单条读数的打分结果
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct RiskScore {
    pub reading_id: i64,          // 读数主键
    pub sensor_id: i64,           // 传感器主键
    pub machine_id: i64,          // 机器主键
    pub machine_name: String,     // 机器名
    pub sensor_type: String,      // 传感器类型
    pub unit: String,             // 计量单位
    pub value: f64,               // 读数值
    pub recorded_at: NaiveDateTime, // 记录时间
    pub features: [f64; NUM_FEATURES], // 实际送入模型的特征向量(标准化前)
    pub probability: f64,         // 故障概率
    pub predicted_label: usize,   // 按 0.5 阈值判类
    pub severity: RiskLevel,      // 概率分档
    pub out_of_range: bool,       // 当前值是否越限
}

// ==========================================
// ScoringEngine - 打分引擎
// ==========================================
pub struct ScoringEngine {
    reading_repo: Arc<ReadingRepository>,
}

impl ScoringEngine {
    pub fn new(reading_repo: Arc<ReadingRepository>) -> Self {
        Self { reading_repo }
    }

    /// 给最新一条读数打分,库为空时返回 None
    pub fn score_latest(&self, model: &RiskModel) -> EngineResult<Option<RiskScore>> {
        match self.reading_repo.latest_detail()? {
            Some(detail) => Ok(Some(self.score_detail(model, &detail)?)),
            None => Ok(None),
        }
    }

    /// 给指定读数明细打分
    ///
    /// # 说明
    /// - 滚动窗口从库里按该读数截止时刻回取
    /// - 训练集未见过的传感器类型编码取 -1 并告警
    pub fn score_detail(
        &self,
        model: &RiskModel,
        detail: &ReadingDetail,
    ) -> EngineResult<RiskScore> {
        let code = match model.code_book.code(&detail.sensor_type) {
            Some(code) => code,
            None => {
                warn!(
                    sensor_type = %detail.sensor_type,
                    "传感器类型未出现在训练集中,编码按 -1 处理"
                );
                -1
            }
        };

        let recent = self.reading_repo.fetch_recent_values(
            detail.sensor_id,
            detail.recorded_at,
            detail.reading_id,
            ROLLING_WINDOW,
        )?;

        let features = scoring_features(detail, &recent, code);
        let scaled = model.scaler.transform(&features);
        let probability = model.forest.predict_proba(&scaled);

        Ok(RiskScore {
            reading_id: detail.reading_id,
            sensor_id: detail.sensor_id,
            machine_id: detail.machine_id,
            machine_name: detail.machine_name.clone(),
            sensor_type: detail.sensor_type.clone(),
            unit: detail.unit.clone(),
            value: detail.value,
            recorded_at: detail.recorded_at,
            features,
            probability,
            predicted_label: usize::from(probability >= CLASSIFICATION_THRESHOLD),
            severity: RiskLevel::from_probability(probability),
            out_of_range: detail.is_out_of_range(),
        })
    }
}
