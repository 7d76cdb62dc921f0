// ==========================================
// 工业传感器监测系统 - 随机森林
// ==========================================
// 职责: 自助采样 + 随机特征子集的树集成,输出故障概率
// 红线: 同一种子必须产出同一森林,任何平台上结果一致
// ==========================================

use crate::engine::features::NUM_FEATURES;
use crate::engine::tree::{DecisionTree, TreeParams};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// 森林训练参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestParams {
    pub n_trees: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub seed: u64,
}

impl Default for RandomForestParams {
    fn default() -> Self {
        RandomForestParams {
            n_trees: 100,
            max_depth: Some(32),
            min_samples_split: 2,
            min_samples_leaf: 1,
            seed: 42,
        }
    }
}

// ==========================================
// RandomForest - 随机森林分类器
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    params: RandomForestParams,
}

impl RandomForest {
    /// 训练森林
    ///
    /// # 说明
    /// - 每棵树在 n 条自助采样(有放回)样本上训练
    /// - 每个节点只考察 sqrt(特征数) 个随机特征
    /// - 所有随机性来自 params.seed 派生的单一 ChaCha8 流
    pub fn fit(samples: &[[f64; NUM_FEATURES]], labels: &[usize], params: RandomForestParams) -> Self {
        let n = samples.len();
        let tree_params = TreeParams {
            max_depth: params.max_depth.unwrap_or(usize::MAX),
            min_samples_split: params.min_samples_split,
            min_samples_leaf: params.min_samples_leaf,
            n_split_features: split_feature_count(),
        };

        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
        let mut trees = Vec::with_capacity(params.n_trees);
        for _ in 0..params.n_trees {
            let indices: Vec<usize> = (0..n).map(|_| rng.random_range(0..n)).collect();
            trees.push(DecisionTree::fit(samples, labels, indices, &tree_params, &mut rng));
        }

        RandomForest { trees, params }
    }

    /// 单样本故障概率: 各树叶节点正类占比的均值
    pub fn predict_proba(&self, features: &[f64; NUM_FEATURES]) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let sum: f64 = self
            .trees
            .iter()
            .map(|tree| tree.predict_prob(features))
            .sum();
        sum / self.trees.len() as f64
    }

    /// 按阈值判类(1 = 预测故障)
    pub fn predict(&self, features: &[f64; NUM_FEATURES], threshold: f64) -> usize {
        usize::from(self.predict_proba(features) >= threshold)
    }

    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    pub fn seed(&self) -> u64 {
        self.params.seed
    }
}

/// 每个分裂节点考察的特征数: floor(sqrt(NUM_FEATURES)),至少 1
fn split_feature_count() -> usize {
    ((NUM_FEATURES as f64).sqrt() as usize).max(1)
}
