// ==========================================
// 工业传感器监测系统 - 阈值规则告警
// ==========================================
// 职责: 对模拟工况记录做固定阈值分级
// 说明: 与模型打分互补,规则只看当前一条记录
// ==========================================

use crate::domain::dataset::SyntheticRecord;
use crate::domain::types::RiskLevel;
use serde::{Deserialize, Serialize};

// ==========================================
// RuleModel - 阈值规则
// ==========================================
/// 固定阈值规则
///
/// # 说明
/// - 工艺温度或刀具磨损越限 -> 高风险
/// - 否则扭矩越限 -> 中风险
/// - 其余 -> 低风险
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleModel {
    pub process_temp_limit_k: f64,
    pub tool_wear_limit_min: u32,
    pub torque_limit_nm: f64,
}

impl Default for RuleModel {
    fn default() -> Self {
        RuleModel {
            process_temp_limit_k: 340.0,
            tool_wear_limit_min: 180,
            torque_limit_nm: 90.0,
        }
    }
}

/// 单条记录的分级结果
#[derive(Debug, Clone, Serialize)]
pub struct RuleVerdict {
    pub level: RiskLevel,
    pub reasons: Vec<String>,
}

/// 批量分级的计数
#[derive(Debug, Clone, Default, Serialize)]
pub struct RuleDistribution {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl RuleModel {
    /// 对单条记录分级
    pub fn evaluate(&self, record: &SyntheticRecord) -> RuleVerdict {
        let mut reasons = Vec::new();

        if record.process_temp_k > self.process_temp_limit_k {
            reasons.push(format!(
                "工艺温度超限: {:.1} K > {:.1} K",
                record.process_temp_k, self.process_temp_limit_k
            ));
        }
        if record.tool_wear_min > self.tool_wear_limit_min {
            reasons.push(format!(
                "刀具磨损超限: {} min > {} min",
                record.tool_wear_min, self.tool_wear_limit_min
            ));
        }
        if !reasons.is_empty() {
            return RuleVerdict {
                level: RiskLevel::High,
                reasons,
            };
        }

        if record.torque_nm > self.torque_limit_nm {
            return RuleVerdict {
                level: RiskLevel::Medium,
                reasons: vec![format!(
                    "扭矩超限: {:.1} Nm > {:.1} Nm",
                    record.torque_nm, self.torque_limit_nm
                )],
            };
        }

        RuleVerdict {
            level: RiskLevel::Low,
            reasons: Vec::new(),
        }
    }

    /// 批量分级计数
    pub fn distribution(&self, records: &[SyntheticRecord]) -> RuleDistribution {
        let mut dist = RuleDistribution::default();
        for record in records {
            match self.evaluate(record).level {
                RiskLevel::Low => dist.low += 1,
                RiskLevel::Medium => dist.medium += 1,
                RiskLevel::High => dist.high += 1,
            }
        }
        dist
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{FailureKind, QualityGrade};

    fn record(process_temp_k: f64, torque_nm: f64, tool_wear_min: u32) -> SyntheticRecord {
        SyntheticRecord {
            udi: 1,
            product_id: "M00001".to_string(),
            product_class: QualityGrade::Medium,
            air_temp_k: 300.0,
            process_temp_k,
            rotation_rpm: 1500.0,
            torque_nm,
            tool_wear_min,
            failed: false,
            failure_kind: FailureKind::NoFailure,
        }
    }

    #[test]
    fn test_nominal_record_is_low() {
        let verdict = RuleModel::default().evaluate(&record(310.0, 40.0, 100));
        assert_eq!(verdict.level, RiskLevel::Low);
        assert!(verdict.reasons.is_empty());
    }

    #[test]
    fn test_process_temp_over_limit_is_high() {
        let verdict = RuleModel::default().evaluate(&record(345.0, 40.0, 100));
        assert_eq!(verdict.level, RiskLevel::High);
        assert_eq!(verdict.reasons.len(), 1);
    }

    #[test]
    fn test_tool_wear_over_limit_is_high() {
        let verdict = RuleModel::default().evaluate(&record(310.0, 40.0, 190));
        assert_eq!(verdict.level, RiskLevel::High);
    }

    #[test]
    fn test_both_high_causes_collect_two_reasons() {
        let verdict = RuleModel::default().evaluate(&record(345.0, 40.0, 190));
        assert_eq!(verdict.level, RiskLevel::High);
        assert_eq!(verdict.reasons.len(), 2);
    }

    #[test]
    fn test_torque_over_limit_is_medium() {
        let verdict = RuleModel::default().evaluate(&record(310.0, 95.0, 100));
        assert_eq!(verdict.level, RiskLevel::Medium);
        assert_eq!(verdict.reasons.len(), 1);
    }

    #[test]
    fn test_high_rule_shadows_torque() {
        // 高风险命中后不再看扭矩
        let verdict = RuleModel::default().evaluate(&record(345.0, 95.0, 100));
        assert_eq!(verdict.level, RiskLevel::High);
        assert_eq!(verdict.reasons.len(), 1);
    }

    #[test]
    fn test_boundary_values_are_not_violations() {
        let verdict = RuleModel::default().evaluate(&record(340.0, 90.0, 180));
        assert_eq!(verdict.level, RiskLevel::Low);
    }

    #[test]
    fn test_distribution_counts() {
        let records = vec![
            record(310.0, 40.0, 100),
            record(345.0, 40.0, 100),
            record(310.0, 95.0, 100),
            record(310.0, 40.0, 190),
        ];
        let dist = RuleModel::default().distribution(&records);
        assert_eq!(dist.low, 1);
        assert_eq!(dist.medium, 1);
        assert_eq!(dist.high, 2);
    }
}
