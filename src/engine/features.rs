// ==========================================
// 工业传感器监测系统 - 特征推导
// ==========================================
// 职责: 把读数明细变换为训练/打分用的特征行
// 红线: 训练与打分必须走同一套特征定义,列序固定
// ==========================================

use crate::domain::reading::ReadingDetail;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 滚动窗口大小(含当前读数)
pub const ROLLING_WINDOW: usize = 5;

/// 特征维数
pub const NUM_FEATURES: usize = 6;

/// 特征列名(列序即特征向量的下标序)
pub const FEATURE_NAMES: [&str; NUM_FEATURES] = [
    "value",
    "value_minus_min",
    "max_minus_value",
    "sensor_type_code",
    "rolling_mean_5",
    "rolling_std_5",
];

// ==========================================
// TypeCodeBook - 传感器类型编码表
// ==========================================
/// 传感器类型 -> 整数编码的映射
///
/// # 说明
/// - 训练时按"首次出现"顺序分配编码,随模型工件持久化
/// - 打分时只查表,训练集未见过的类型无编码
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeCodeBook {
    types: Vec<String>,
}

impl TypeCodeBook {
    pub fn new() -> Self {
        Self { types: Vec::new() }
    }

    /// 查到已有编码,否则按首次出现顺序分配新编码
    pub fn intern(&mut self, sensor_type: &str) -> i64 {
        if let Some(code) = self.code(sensor_type) {
            return code;
        }
        self.types.push(sensor_type.to_string());
        (self.types.len() - 1) as i64
    }

    /// 只查表,未知类型返回 None
    pub fn code(&self, sensor_type: &str) -> Option<i64> {
        self.types
            .iter()
            .position(|t| t == sensor_type)
            .map(|i| i as i64)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

// ==========================================
// FeatureRow - 特征行
// ==========================================
/// 一条读数推导出的特征向量与标签
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureRow {
    pub reading_id: i64,                   // 来源读数
    pub sensor_id: i64,                    // 来源传感器
    pub label: usize,                      // 越限标签 (0/1)
    pub features: [f64; NUM_FEATURES],     // 特征向量(列序见 FEATURE_NAMES)
}

/// 从读数明细推导特征行
///
/// # 参数
/// - details: 读数明细(任意顺序,内部按时间升序重排)
///
/// # 返回
/// - 特征行(时间升序)与本批次的类型编码表
///
/// # 说明
/// - 标签: 上下限齐备且值越限为 1,否则为 0
/// - 距界特征: 对应界限缺失时取 0
/// - 滚动统计: 按传感器分组,窗口为最近 ROLLING_WINDOW 条(含当前),
///   均值对不足窗口的前缀照常计算,标准差在窗口内不足 2 条时取 0
pub fn derive_features(details: &[ReadingDetail]) -> (Vec<FeatureRow>, TypeCodeBook) {
    let mut sorted: Vec<&ReadingDetail> = details.iter().collect();
    sorted.sort_by(|a, b| {
        a.recorded_at
            .cmp(&b.recorded_at)
            .then(a.reading_id.cmp(&b.reading_id))
    });

    let mut book = TypeCodeBook::new();
    let mut windows: HashMap<i64, Vec<f64>> = HashMap::new();
    let mut rows = Vec::with_capacity(sorted.len());

    for detail in sorted {
        let window = windows.entry(detail.sensor_id).or_default();
        window.push(detail.value);
        if window.len() > ROLLING_WINDOW {
            window.remove(0);
        }

        let (mean, std) = rolling_stats(window);
        let code = book.intern(&detail.sensor_type);
        rows.push(FeatureRow {
            reading_id: detail.reading_id,
            sensor_id: detail.sensor_id,
            label: usize::from(detail.is_out_of_range()),
            features: feature_vector(detail, mean, std, code),
        });
    }

    (rows, book)
}

/// 打分时的特征向量组装
///
/// # 参数
/// - detail: 待打分的读数明细
/// - recent_values: 该传感器截至本条读数(含)的最近窗口值,时间升序
/// - code: 类型编码(训练集未见过的类型由调用方给 -1)
pub fn scoring_features(
    detail: &ReadingDetail,
    recent_values: &[f64],
    code: i64,
) -> [f64; NUM_FEATURES] {
    let fallback = [detail.value];
    let window: &[f64] = if recent_values.is_empty() {
        &fallback
    } else {
        recent_values
    };
    let tail_start = window.len().saturating_sub(ROLLING_WINDOW);
    let (mean, std) = rolling_stats(&window[tail_start..]);
    feature_vector(detail, mean, std, code)
}

/// 窗口均值与样本标准差(n<2 时标准差为 0)
pub fn rolling_stats(window: &[f64]) -> (f64, f64) {
    if window.is_empty() {
        return (0.0, 0.0);
    }
    let n = window.len() as f64;
    let mean = window.iter().sum::<f64>() / n;
    if window.len() < 2 {
        return (mean, 0.0);
    }
    let var = window.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, var.sqrt())
}

/// 按固定列序拼特征向量
fn feature_vector(detail: &ReadingDetail, mean: f64, std: f64, code: i64) -> [f64; NUM_FEATURES] {
    let value_minus_min = detail.min_limit.map_or(0.0, |lo| detail.value - lo);
    let max_minus_value = detail.max_limit.map_or(0.0, |hi| hi - detail.value);
    [
        detail.value,
        value_minus_min,
        max_minus_value,
        code as f64,
        mean,
        std,
    ]
}
