// ==========================================
// 工业传感器监测系统 - 领域类型定义
// ==========================================
// 职责: 全局共享的枚举类型与数据库字符串映射
// 红线: 序列化格式 SCREAMING_SNAKE_CASE,与数据库存储一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 风险等级 (Risk Level)
// ==========================================
// 规则模型输出与故障事件严重度共用同一等级体系
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,    // 低风险
    Medium, // 中风险
    High,   // 高风险
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

impl RiskLevel {
    /// 从字符串解析风险等级(未知值回退为 Low)
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "HIGH" => RiskLevel::High,
            "MEDIUM" => RiskLevel::Medium,
            _ => RiskLevel::Low,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }

    /// 按故障概率划分严重度档位
    ///
    /// # 参数
    /// - probability: 模型输出的故障概率 [0,1]
    ///
    /// # 说明
    /// - < 0.3 为低, < 0.7 为中, 其余为高
    pub fn from_probability(probability: f64) -> Self {
        if probability < 0.3 {
            RiskLevel::Low
        } else if probability < 0.7 {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

// ==========================================
// 机器状态 (Machine Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MachineStatus {
    Active,      // 运行中
    Maintenance, // 检修中
    Retired,     // 已退役
}

impl fmt::Display for MachineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MachineStatus::Active => write!(f, "ACTIVE"),
            MachineStatus::Maintenance => write!(f, "MAINTENANCE"),
            MachineStatus::Retired => write!(f, "RETIRED"),
        }
    }
}

impl MachineStatus {
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "MAINTENANCE" => MachineStatus::Maintenance,
            "RETIRED" => MachineStatus::Retired,
            _ => MachineStatus::Active,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            MachineStatus::Active => "ACTIVE",
            MachineStatus::Maintenance => "MAINTENANCE",
            MachineStatus::Retired => "RETIRED",
        }
    }
}

// ==========================================
// 机器质量档位 (Machine Quality)
// ==========================================
// 登记机器时人工评定的设备质量档位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MachineQuality {
    Low,    // 低
    Medium, // 中
    High,   // 高
}

impl fmt::Display for MachineQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MachineQuality::Low => write!(f, "LOW"),
            MachineQuality::Medium => write!(f, "MEDIUM"),
            MachineQuality::High => write!(f, "HIGH"),
        }
    }
}

impl MachineQuality {
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "LOW" => MachineQuality::Low,
            "MEDIUM" => MachineQuality::Medium,
            _ => MachineQuality::High,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            MachineQuality::Low => "LOW",
            MachineQuality::Medium => "MEDIUM",
            MachineQuality::High => "HIGH",
        }
    }
}

// ==========================================
// 传感器状态 (Sensor Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SensorStatus {
    Active,   // 在线
    Inactive, // 停用
    Faulty,   // 故障
}

impl fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorStatus::Active => write!(f, "ACTIVE"),
            SensorStatus::Inactive => write!(f, "INACTIVE"),
            SensorStatus::Faulty => write!(f, "FAULTY"),
        }
    }
}

impl SensorStatus {
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "INACTIVE" => SensorStatus::Inactive,
            "FAULTY" => SensorStatus::Faulty,
            _ => SensorStatus::Active,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            SensorStatus::Active => "ACTIVE",
            SensorStatus::Inactive => "INACTIVE",
            SensorStatus::Faulty => "FAULTY",
        }
    }
}

// ==========================================
// 故障事件状态 (Failure Event Status)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureEventStatus {
    Open,   // 待处理
    Closed, // 已关闭
}

impl fmt::Display for FailureEventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureEventStatus::Open => write!(f, "OPEN"),
            FailureEventStatus::Closed => write!(f, "CLOSED"),
        }
    }
}

impl FailureEventStatus {
    pub fn from_str(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "CLOSED" => FailureEventStatus::Closed,
            _ => FailureEventStatus::Open,
        }
    }

    pub fn to_db_str(&self) -> &'static str {
        match self {
            FailureEventStatus::Open => "OPEN",
            FailureEventStatus::Closed => "CLOSED",
        }
    }
}

// ==========================================
// 产品质量等级 (Quality Grade)
// ==========================================
// 合成数据集中产品的质量等级,对应产品号前缀字母 L/M/H
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualityGrade {
    Low,    // 低端 (L)
    Medium, // 中端 (M)
    High,   // 高端 (H)
}

impl fmt::Display for QualityGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl QualityGrade {
    /// 产品号前缀字母
    pub fn code(&self) -> &'static str {
        match self {
            QualityGrade::Low => "L",
            QualityGrade::Medium => "M",
            QualityGrade::High => "H",
        }
    }

    /// 从数据集 `Tipo` 列解析质量等级
    ///
    /// # 说明
    /// - 同时接受字母代码 (L/M/H) 与葡语等级名 (Baixa/Média/Alta)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "L" | "l" | "Baixa" => Some(QualityGrade::Low),
            "M" | "m" | "Média" | "Media" => Some(QualityGrade::Medium),
            "H" | "h" | "Alta" => Some(QualityGrade::High),
            _ => None,
        }
    }
}

// ==========================================
// 故障类型 (Failure Kind)
// ==========================================
// 合成数据集 `Tipo de falha` 列的固定词表
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureKind {
    NoFailure,         // 无故障
    PowerFailure,      // 电力故障
    ToolWearFailure,   // 刀具磨损故障
    OverstrainFailure, // 过载故障
    RandomFailure,     // 随机故障
}

/// 故障行可抽取的故障类型(不含 NoFailure)
pub const FAILURE_KINDS: [FailureKind; 4] = [
    FailureKind::PowerFailure,
    FailureKind::ToolWearFailure,
    FailureKind::OverstrainFailure,
    FailureKind::RandomFailure,
];

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FailureKind {
    /// 数据集中的标准文本标签
    pub fn label(&self) -> &'static str {
        match self {
            FailureKind::NoFailure => "No Failure",
            FailureKind::PowerFailure => "Power Failure",
            FailureKind::ToolWearFailure => "Tool Wear Failure",
            FailureKind::OverstrainFailure => "Overstrain Failure",
            FailureKind::RandomFailure => "Random Failure",
        }
    }

    /// 从数据集文本标签解析故障类型
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "No Failure" => Some(FailureKind::NoFailure),
            "Power Failure" => Some(FailureKind::PowerFailure),
            "Tool Wear Failure" => Some(FailureKind::ToolWearFailure),
            "Overstrain Failure" => Some(FailureKind::OverstrainFailure),
            "Random Failure" => Some(FailureKind::RandomFailure),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_level_ordering() {
        assert!(RiskLevel::Low < RiskLevel::Medium);
        assert!(RiskLevel::Medium < RiskLevel::High);
    }

    #[test]
    fn test_risk_level_from_probability() {
        assert_eq!(RiskLevel::from_probability(0.0), RiskLevel::Low);
        assert_eq!(RiskLevel::from_probability(0.29), RiskLevel::Low);
        assert_eq!(RiskLevel::from_probability(0.3), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_probability(0.69), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_probability(0.7), RiskLevel::High);
        assert_eq!(RiskLevel::from_probability(1.0), RiskLevel::High);
    }

    #[test]
    fn test_risk_level_db_roundtrip() {
        for level in [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High] {
            assert_eq!(RiskLevel::from_str(level.to_db_str()), level);
        }
    }

    #[test]
    fn test_machine_status_unknown_falls_back_to_active() {
        assert_eq!(MachineStatus::from_str("???"), MachineStatus::Active);
    }

    #[test]
    fn test_machine_quality_db_roundtrip() {
        for quality in [
            MachineQuality::Low,
            MachineQuality::Medium,
            MachineQuality::High,
        ] {
            assert_eq!(MachineQuality::from_str(quality.to_db_str()), quality);
        }
    }

    #[test]
    fn test_failure_event_status_db_roundtrip() {
        for status in [FailureEventStatus::Open, FailureEventStatus::Closed] {
            assert_eq!(FailureEventStatus::from_str(status.to_db_str()), status);
        }
    }

    #[test]
    fn test_quality_grade_parse_accepts_both_forms() {
        assert_eq!(QualityGrade::parse("L"), Some(QualityGrade::Low));
        assert_eq!(QualityGrade::parse("Baixa"), Some(QualityGrade::Low));
        assert_eq!(QualityGrade::parse("Média"), Some(QualityGrade::Medium));
        assert_eq!(QualityGrade::parse("Alta"), Some(QualityGrade::High));
        assert_eq!(QualityGrade::parse("X"), None);
    }

    #[test]
    fn test_failure_kind_label_roundtrip() {
        for kind in [
            FailureKind::NoFailure,
            FailureKind::PowerFailure,
            FailureKind::ToolWearFailure,
            FailureKind::OverstrainFailure,
            FailureKind::RandomFailure,
        ] {
            assert_eq!(FailureKind::parse(kind.label()), Some(kind));
        }
    }

    #[test]
    fn test_failure_kinds_exclude_no_failure() {
        assert!(!FAILURE_KINDS.contains(&FailureKind::NoFailure));
        assert_eq!(FAILURE_KINDS.len(), 4);
    }
}
