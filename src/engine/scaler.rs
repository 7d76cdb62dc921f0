// ==========================================
// 工业传感器监测系统 - 特征标准化
// ==========================================
// 职责: 按训练集的均值/标准差做 z-score 标准化
// 红线: 打分必须复用训练时拟合的参数,不得重新拟合
// ==========================================

use crate::engine::features::NUM_FEATURES;
use serde::{Deserialize, Serialize};

// ==========================================
// StandardScaler - 标准化器
// ==========================================
/// z-score 标准化: (x - mean) / scale
///
/// # 说明
/// - mean/scale 按列在训练集上拟合(总体标准差)
/// - 零方差列 scale 取 1,该列原样通过
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// 在训练集上拟合
    pub fn fit(samples: &[[f64; NUM_FEATURES]]) -> Self {
        let n = samples.len();
        let mut mean = vec![0.0; NUM_FEATURES];
        let mut scale = vec![1.0; NUM_FEATURES];
        if n == 0 {
            return Self { mean, scale };
        }

        for sample in samples {
            for (j, v) in sample.iter().enumerate() {
                mean[j] += v;
            }
        }
        for m in mean.iter_mut() {
            *m /= n as f64;
        }

        for (j, s) in scale.iter_mut().enumerate() {
            let var = samples
                .iter()
                .map(|sample| (sample[j] - mean[j]).powi(2))
                .sum::<f64>()
                / n as f64;
            let std = var.sqrt();
            *s = if std > 0.0 { std } else { 1.0 };
        }

        Self { mean, scale }
    }

    /// 标准化单个特征向量
    pub fn transform(&self, features: &[f64; NUM_FEATURES]) -> [f64; NUM_FEATURES] {
        let mut out = [0.0; NUM_FEATURES];
        for (j, v) in features.iter().enumerate() {
            out[j] = (v - self.mean[j]) / self.scale[j];
        }
        out
    }

    /// 批量标准化
    pub fn transform_batch(&self, samples: &[[f64; NUM_FEATURES]]) -> Vec<[f64; NUM_FEATURES]> {
        samples.iter().map(|s| self.transform(s)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(v: f64) -> [f64; NUM_FEATURES] {
        [v, 0.0, 0.0, 0.0, 0.0, 0.0]
    }

    #[test]
    fn test_fit_transform_zero_mean_unit_variance() {
        let samples = vec![row(1.0), row(2.0), row(3.0), row(4.0)];
        let scaler = StandardScaler::fit(&samples);
        let transformed = scaler.transform_batch(&samples);

        let mean: f64 = transformed.iter().map(|r| r[0]).sum::<f64>() / 4.0;
        assert!(mean.abs() < 1e-12);

        let var: f64 = transformed.iter().map(|r| r[0] * r[0]).sum::<f64>() / 4.0;
        assert!((var - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_variance_column_passes_through() {
        let samples = vec![row(5.0), row(5.0), row(5.0)];
        let scaler = StandardScaler::fit(&samples);
        let out = scaler.transform(&row(5.0));
        assert_eq!(out[0], 0.0);
        // 常数列平移后保持 0,不放大
        let out2 = scaler.transform(&row(7.0));
        assert_eq!(out2[0], 2.0);
    }

    #[test]
    fn test_transform_uses_fitted_params() {
        let samples = vec![row(0.0), row(10.0)];
        let scaler = StandardScaler::fit(&samples);
        // mean=5, 总体标准差=5
        let out = scaler.transform(&row(10.0));
        assert!((out[0] - 1.0).abs() < 1e-12);
        let out = scaler.transform(&row(20.0));
        assert!((out[0] - 3.0).abs() < 1e-12);
    }
}
