// ==========================================
// 工业传感器监测系统 - 合成数据集生成器
// ==========================================
// 用途: 生成 AI4I 风格的模拟传感器数据,供演示与模型冒烟
// 红线: 同一 (n_samples, seed) 必须产出逐位相同的数据
// ==========================================

use crate::domain::dataset::SyntheticRecord;
use crate::domain::types::{FailureKind, QualityGrade, FAILURE_KINDS};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

/// 空气温度均值 [K] (~25°C)
const AIR_TEMP_MEAN_K: f64 = 298.0;
/// 空气温度标准差 [K]
const AIR_TEMP_STD_K: f64 = 1.0;
/// 工艺温度均值 [K] (~35°C)
const PROCESS_TEMP_MEAN_K: f64 = 308.0;
/// 工艺温度标准差 [K]
const PROCESS_TEMP_STD_K: f64 = 2.0;
/// 转速均值 [rpm]
const ROTATION_MEAN_RPM: f64 = 1500.0;
/// 转速标准差 [rpm]
const ROTATION_STD_RPM: f64 = 100.0;
/// 扭矩均值 [Nm]
const TORQUE_MEAN_NM: f64 = 40.0;
/// 扭矩标准差 [Nm]
const TORQUE_STD_NM: f64 = 5.0;
/// 刀具磨损上限 [min] (右开区间)
const TOOL_WEAR_MAX_MIN: u32 = 240;
/// 单行故障概率
const FAILURE_PROBABILITY: f64 = 0.1;
/// 产品质量等级为 M 的概率(其余为 L)
const MEDIUM_GRADE_PROBABILITY: f64 = 0.5;

/// 生成确定性合成数据集
///
/// # 参数
/// - n_samples: 行数
/// - seed: 随机种子
///
/// # 说明
/// - 每行按固定顺序抽样: 质量等级 -> 四路高斯通道 -> 刀具磨损 -> 故障标记 -> 故障类型
/// - 故障行才抽取故障类型,且只从四种真实故障中等概率抽取
pub fn generate_dataset(n_samples: usize, seed: u64) -> Vec<SyntheticRecord> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut records = Vec::with_capacity(n_samples);

    for udi in 1..=n_samples as u32 {
        records.push(generate_record(udi, &mut rng));
    }

    records
}

/// 生成单行数据
fn generate_record(udi: u32, rng: &mut ChaCha8Rng) -> SyntheticRecord {
    let grade = if rng.random_bool(MEDIUM_GRADE_PROBABILITY) {
        QualityGrade::Medium
    } else {
        QualityGrade::Low
    };

    let air_temp_k = gaussian(rng, AIR_TEMP_MEAN_K, AIR_TEMP_STD_K);
    let process_temp_k = gaussian(rng, PROCESS_TEMP_MEAN_K, PROCESS_TEMP_STD_K);
    let rotation_rpm = gaussian(rng, ROTATION_MEAN_RPM, ROTATION_STD_RPM);
    let torque_nm = gaussian(rng, TORQUE_MEAN_NM, TORQUE_STD_NM);
    let tool_wear_min = rng.random_range(0..TOOL_WEAR_MAX_MIN);

    let failed = rng.random_bool(FAILURE_PROBABILITY);
    let failure_kind = if failed {
        FAILURE_KINDS[rng.random_range(0..FAILURE_KINDS.len())]
    } else {
        FailureKind::NoFailure
    };

    SyntheticRecord {
        udi,
        product_id: SyntheticRecord::format_product_id(grade, udi),
        product_class: grade,
        air_temp_k,
        process_temp_k,
        rotation_rpm,
        torque_nm,
        tool_wear_min,
        failed,
        failure_kind,
    }
}

/// 高斯抽样: mean + std * z
fn gaussian(rng: &mut ChaCha8Rng, mean: f64, std: f64) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    mean + std * z
}

// ==========================================
// DatasetSummary - 数据集概要
// ==========================================
/// 数据集概要统计(CLI 汇报用)
#[derive(Debug, Clone)]
pub struct DatasetSummary {
    pub total: usize,
    pub failure_count: usize,
    pub kind_counts: Vec<(FailureKind, usize)>,
}

impl DatasetSummary {
    /// 故障率 [0,1],空数据集为 0
    pub fn failure_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.failure_count as f64 / self.total as f64
    }
}

/// 汇总数据集
pub fn summarize(records: &[SyntheticRecord]) -> DatasetSummary {
    let all_kinds = [
        FailureKind::NoFailure,
        FailureKind::PowerFailure,
        FailureKind::ToolWearFailure,
        FailureKind::OverstrainFailure,
        FailureKind::RandomFailure,
    ];

    let failure_count = records.iter().filter(|r| r.failed).count();
    let kind_counts = all_kinds
        .iter()
        .map(|kind| {
            let count = records.iter().filter(|r| r.failure_kind == *kind).count();
            (*kind, count)
        })
        .collect();

    DatasetSummary {
        total: records.len(),
        failure_count,
        kind_counts,
    }
}
