// ==========================================
// 工业传感器监测系统 - 读数模拟
// ==========================================
// 用途: 围绕传感器正常区间生成抖动读数;巡检 tick 的全通道随机行
// ==========================================

use crate::domain::dataset::SyntheticRecord;
use crate::domain::sensor::Sensor;
use crate::domain::types::{FailureKind, QualityGrade};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

/// 区间缺省下限(传感器未配置下限时)
const FALLBACK_MIN: f64 = 0.0;
/// 区间缺省上限(传感器未配置上限时)
const FALLBACK_MAX: f64 = 100.0;

/// 围绕正常区间中心生成抖动读数值
///
/// # 参数
/// - sensor: 目标传感器(取其上下限,缺失时用 0/100 兜底)
/// - count: 生成条数
///
/// # 说明
/// - 抖动幅度 sigma = (hi - lo + 1) / 8
/// - 结果截断在 [lo - (hi-lo)*0.5, hi + (hi-lo)*0.5],越限值可出现但不离谱
pub fn simulate_band_values(sensor: &Sensor, count: usize, rng: &mut ChaCha8Rng) -> Vec<f64> {
    let lo = sensor.min_limit.unwrap_or(FALLBACK_MIN);
    let hi = sensor.max_limit.unwrap_or(FALLBACK_MAX);
    let center = (hi + lo) / 2.0;
    let sigma = (hi - lo + 1.0) / 8.0;
    let floor = lo - (hi - lo) * 0.5;
    let ceil = hi + (hi - lo) * 0.5;

    (0..count)
        .map(|_| {
            let z: f64 = rng.sample(StandardNormal);
            (center + sigma * z).clamp(floor, ceil)
        })
        .collect()
}

/// 巡检 tick: 生成一行全通道随机读数
///
/// # 参数
/// - udi: 行号(tick 序号)
///
/// # 说明
/// - 各通道在固定区间内均匀抽样,区间覆盖规则模型的触发阈值,
///   因此连续 tick 中会自然出现高风险行
pub fn monitor_tick_record(udi: u32, rng: &mut ChaCha8Rng) -> SyntheticRecord {
    let air_temp_k = rng.random_range(290.0..320.0);
    let process_temp_k = rng.random_range(300.0..350.0);
    let rotation_rpm = rng.random_range(1000.0..3000.0);
    let torque_nm = rng.random_range(20.0..100.0);
    let tool_wear_min = rng.random_range(0..200);

    SyntheticRecord {
        udi,
        product_id: SyntheticRecord::format_product_id(QualityGrade::Medium, udi),
        product_class: QualityGrade::Medium,
        air_temp_k,
        process_temp_k,
        rotation_rpm,
        torque_nm,
        tool_wear_min,
        failed: false,
        failure_kind: FailureKind::NoFailure,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn sensor_with_limits(min_limit: Option<f64>, max_limit: Option<f64>) -> Sensor {
        Sensor::new("Temperatura", "C", 1, min_limit, max_limit)
    }

    #[test]
    fn test_band_values_are_clamped() {
        let sensor = sensor_with_limits(Some(0.0), Some(100.0));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for v in simulate_band_values(&sensor, 1000, &mut rng) {
            assert!(v >= -50.0 && v <= 150.0, "v={}", v);
        }
    }

    #[test]
    fn test_band_values_center_near_midpoint() {
        let sensor = sensor_with_limits(Some(0.0), Some(100.0));
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let values = simulate_band_values(&sensor, 2000, &mut rng);
        let mean: f64 = values.iter().sum::<f64>() / values.len() as f64;
        assert!((mean - 50.0).abs() < 2.0, "mean={}", mean);
    }

    #[test]
    fn test_band_values_use_fallback_bounds() {
        let sensor = sensor_with_limits(None, None);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for v in simulate_band_values(&sensor, 500, &mut rng) {
            assert!(v >= -50.0 && v <= 150.0);
        }
    }

    #[test]
    fn test_band_values_deterministic_per_seed() {
        let sensor = sensor_with_limits(Some(10.0), Some(20.0));
        let mut rng_a = ChaCha8Rng::seed_from_u64(42);
        let mut rng_b = ChaCha8Rng::seed_from_u64(42);
        assert_eq!(
            simulate_band_values(&sensor, 20, &mut rng_a),
            simulate_band_values(&sensor, 20, &mut rng_b)
        );
    }

    #[test]
    fn test_monitor_tick_channels_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for udi in 1..=500 {
            let record = monitor_tick_record(udi, &mut rng);
            assert!(record.air_temp_k >= 290.0 && record.air_temp_k < 320.0);
            assert!(record.process_temp_k >= 300.0 && record.process_temp_k < 350.0);
            assert!(record.rotation_rpm >= 1000.0 && record.rotation_rpm < 3000.0);
            assert!(record.torque_nm >= 20.0 && record.torque_nm < 100.0);
            assert!(record.tool_wear_min < 200);
            assert!(!record.failed);
        }
    }
}
