// ==========================================
// 工业传感器监测系统 - 决策树 (CART)
// ==========================================
// 职责: 二分类决策树,Gini 不纯度,随机特征子集
// 说明: 仅供随机森林内部使用,单树不对外暴露训练入口
// ==========================================

use crate::engine::features::NUM_FEATURES;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// 增益下限,低于此值不再分裂
const MIN_GAIN: f64 = 1e-12;

/// 单树训练参数(由森林层填充)
#[derive(Debug, Clone)]
pub struct TreeParams {
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub n_split_features: usize,
}

/// 树节点
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// 叶节点: 正类占比
    Leaf { prob: f64 },
    /// 内部节点: feature <= threshold 走 left,否则走 right
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

// ==========================================
// DecisionTree - 决策树
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
    root: usize,
}

impl DecisionTree {
    /// 在指定样本下标集合上训练一棵树
    ///
    /// # 参数
    /// - samples/labels: 全量训练数据
    /// - indices: 本树使用的样本下标(自助采样结果,可含重复)
    /// - params: 树参数
    /// - rng: 森林层传入的种子随机源(特征子集抽样用)
    pub fn fit(
        samples: &[[f64; NUM_FEATURES]],
        labels: &[usize],
        indices: Vec<usize>,
        params: &TreeParams,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let mut builder = TreeBuilder {
            samples,
            labels,
            params,
            nodes: Vec::new(),
        };
        let root = builder.build(indices, 0, rng);
        DecisionTree {
            nodes: builder.nodes,
            root,
        }
    }

    /// 单样本正类概率(叶节点的正类占比)
    pub fn predict_prob(&self, features: &[f64; NUM_FEATURES]) -> f64 {
        let mut idx = self.root;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { prob } => return *prob,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if features[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// 节点数(测试与诊断用)
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

// ==========================================
// TreeBuilder - 递归建树
// ==========================================
struct TreeBuilder<'a> {
    samples: &'a [[f64; NUM_FEATURES]],
    labels: &'a [usize],
    params: &'a TreeParams,
    nodes: Vec<TreeNode>,
}

impl<'a> TreeBuilder<'a> {
    /// 递归构建节点,返回节点下标
    fn build(&mut self, indices: Vec<usize>, depth: usize, rng: &mut ChaCha8Rng) -> usize {
        let n = indices.len();
        let pos = indices.iter().filter(|&&i| self.labels[i] == 1).count();

        let is_pure = pos == 0 || pos == n;
        if is_pure || depth >= self.params.max_depth || n < self.params.min_samples_split {
            return self.push_leaf(pos, n);
        }

        let best = self.find_best_split(&indices, pos, rng);
        let (feature, threshold) = match best {
            Some(split) => split,
            None => return self.push_leaf(pos, n),
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .into_iter()
            .partition(|&i| self.samples[i][feature] <= threshold);

        let left = self.build(left_indices, depth + 1, rng);
        let right = self.build(right_indices, depth + 1, rng);
        self.nodes.push(TreeNode::Split {
            feature,
            threshold,
            left,
            right,
        });
        self.nodes.len() - 1
    }

    fn push_leaf(&mut self, pos: usize, n: usize) -> usize {
        let prob = if n == 0 { 0.0 } else { pos as f64 / n as f64 };
        self.nodes.push(TreeNode::Leaf { prob });
        self.nodes.len() - 1
    }

    /// 在随机特征子集上扫描最优 Gini 分裂点
    fn find_best_split(
        &self,
        indices: &[usize],
        pos: usize,
        rng: &mut ChaCha8Rng,
    ) -> Option<(usize, f64)> {
        let n = indices.len();
        let parent_gini = gini(pos, n);
        let msl = self.params.min_samples_leaf;

        let mut best: Option<(f64, usize, f64)> = None;

        for feature in choose_features(rng, self.params.n_split_features) {
            let mut column: Vec<(f64, usize)> = indices
                .iter()
                .map(|&i| (self.samples[i][feature], self.labels[i]))
                .collect();
            column.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_pos = 0usize;
            for i in 1..n {
                left_pos += column[i - 1].1;

                // 相同取值之间不可分裂
                if column[i - 1].0 >= column[i].0 {
                    continue;
                }
                if i < msl || n - i < msl {
                    continue;
                }

                let right_pos = pos - left_pos;
                let weighted = (i as f64 * gini(left_pos, i)
                    + (n - i) as f64 * gini(right_pos, n - i))
                    / n as f64;
                let gain = parent_gini - weighted;

                if gain > MIN_GAIN && best.map_or(true, |(g, _, _)| gain > g) {
                    let threshold = (column[i - 1].0 + column[i].0) / 2.0;
                    best = Some((gain, feature, threshold));
                }
            }
        }

        best.map(|(_, feature, threshold)| (feature, threshold))
    }
}

/// Gini 不纯度
fn gini(pos: usize, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let p = pos as f64 / n as f64;
    let q = 1.0 - p;
    1.0 - p * p - q * q
}

/// 部分 Fisher-Yates: 不放回抽取 m 个特征下标
fn choose_features(rng: &mut ChaCha8Rng, m: usize) -> Vec<usize> {
    let mut all: Vec<usize> = (0..NUM_FEATURES).collect();
    let m = m.clamp(1, NUM_FEATURES);
    for i in 0..m {
        let j = rng.random_range(i..all.len());
        all.swap(i, j);
    }
    all.truncate(m);
    all
}
