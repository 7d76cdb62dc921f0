// ==========================================
// 工业传感器监测系统 - 分类评估指标
// ==========================================
// 职责: 测试集上的准确率、逐类 P/R/F1 与 ROC-AUC
// 说明: 除零一律记 0.0,单一类别测试集 AUC 置 None
// ==========================================

use serde::{Deserialize, Serialize};

/// 单类别指标
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub class: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// 整体评估结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    pub accuracy: f64,
    pub per_class: Vec<ClassMetrics>,
    /// 测试集仅含单一类别时为 None
    pub roc_auc: Option<f64>,
}

/// 计算二分类评估指标
///
/// # 参数
/// - y_true/y_pred: 真实与预测类别(0/1)
/// - scores: 正类概率,与 y_true 对齐,供 AUC 使用
pub fn evaluate(y_true: &[usize], y_pred: &[usize], scores: &[f64]) -> EvaluationMetrics {
    let n = y_true.len();
    let correct = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();
    let accuracy = if n == 0 { 0.0 } else { correct as f64 / n as f64 };

    let per_class = [0usize, 1usize]
        .iter()
        .map(|&class| class_metrics(y_true, y_pred, class))
        .collect();

    EvaluationMetrics {
        accuracy,
        per_class,
        roc_auc: roc_auc(y_true, scores),
    }
}

fn class_metrics(y_true: &[usize], y_pred: &[usize], class: usize) -> ClassMetrics {
    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut fn_ = 0usize;
    let mut support = 0usize;

    for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
        if t == class {
            support += 1;
            if p == class {
                tp += 1;
            } else {
                fn_ += 1;
            }
        } else if p == class {
            fp += 1;
        }
    }

    let precision = ratio(tp, tp + fp);
    let recall = ratio(tp, tp + fn_);
    let f1 = if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    };

    ClassMetrics {
        class,
        precision,
        recall,
        f1,
        support,
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// 秩和法 ROC-AUC,并列分数取平均秩
pub fn roc_auc(y_true: &[usize], scores: &[f64]) -> Option<f64> {
    let n_pos = y_true.iter().filter(|&&t| t == 1).count();
    let n_neg = y_true.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return None;
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    // 并列区间共享平均秩
    let mut ranks = vec![0.0f64; scores.len()];
    let mut i = 0usize;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && scores[order[j + 1]] == scores[order[i]] {
            j += 1;
        }
        let avg_rank = (i + 1 + j + 1) as f64 / 2.0;
        for &idx in &order[i..=j] {
            ranks[idx] = avg_rank;
        }
        i = j + 1;
    }

    let rank_sum_pos: f64 = y_true
        .iter()
        .zip(ranks.iter())
        .filter(|(&t, _)| t == 1)
        .map(|(_, &r)| r)
        .sum();

    let n_pos_f = n_pos as f64;
    let auc = (rank_sum_pos - n_pos_f * (n_pos_f + 1.0) / 2.0) / (n_pos_f * n_neg as f64);
    Some(auc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_perfect_predictions() {
        let y = vec![0, 1, 0, 1];
        let scores = vec![0.1, 0.9, 0.2, 0.8];
        let m = evaluate(&y, &y, &scores);
        assert_close(m.accuracy, 1.0);
        for c in &m.per_class {
            assert_close(c.precision, 1.0);
            assert_close(c.recall, 1.0);
            assert_close(c.f1, 1.0);
        }
        assert_close(m.roc_auc.unwrap(), 1.0);
    }

    #[test]
    fn test_mixed_predictions_per_class() {
        let y_true = vec![1, 1, 1, 0, 0];
        let y_pred = vec![1, 1, 0, 0, 1];
        let scores = vec![0.9, 0.8, 0.3, 0.2, 0.7];
        let m = evaluate(&y_true, &y_pred, &scores);

        assert_close(m.accuracy, 0.6);
        let neg = &m.per_class[0];
        assert_eq!(neg.class, 0);
        assert_close(neg.precision, 0.5);
        assert_close(neg.recall, 0.5);
        assert_eq!(neg.support, 2);
        let pos = &m.per_class[1];
        assert_eq!(pos.class, 1);
        assert_close(pos.precision, 2.0 / 3.0);
        assert_close(pos.recall, 2.0 / 3.0);
        assert_close(pos.f1, 2.0 / 3.0);
        assert_eq!(pos.support, 3);
    }

    #[test]
    fn test_roc_auc_textbook_case() {
        let y_true = vec![0, 0, 1, 1];
        let scores = vec![0.1, 0.4, 0.35, 0.8];
        assert_close(roc_auc(&y_true, &scores).unwrap(), 0.75);
    }

    #[test]
    fn test_roc_auc_ties_get_average_rank() {
        let y_true = vec![0, 1];
        let scores = vec![0.5, 0.5];
        assert_close(roc_auc(&y_true, &scores).unwrap(), 0.5);
    }

    #[test]
    fn test_roc_auc_single_class_is_none() {
        assert!(roc_auc(&[1, 1, 1], &[0.1, 0.5, 0.9]).is_none());
        assert!(roc_auc(&[0, 0], &[0.1, 0.5]).is_none());
    }

    #[test]
    fn test_zero_division_yields_zero() {
        // 无正类样本也无正类预测
        let y_true = vec![0, 0, 0];
        let y_pred = vec![0, 0, 0];
        let m = evaluate(&y_true, &y_pred, &[0.1, 0.2, 0.3]);
        let pos = &m.per_class[1];
        assert_close(pos.precision, 0.0);
        assert_close(pos.recall, 0.0);
        assert_close(pos.f1, 0.0);
        assert_eq!(pos.support, 0);
        assert!(m.roc_auc.is_none());
    }
}
