// ==========================================
// 工业传感器监测系统 - 训练/测试集切分
// ==========================================
// 职责: 分层随机切分,种子确定
// ==========================================

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

/// 切分结果(返回样本下标)
#[derive(Debug, Clone)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// 分层随机切分
///
/// # 参数
/// - labels: 每个样本的类别标签
/// - test_ratio: 测试集占比 (0,1)
/// - seed: 随机种子
///
/// # 说明
/// - 每个类别内独立洗牌后按占比取整划出测试份额
/// - 类别样本数 >= 2 时保证训练/测试两侧都非空
/// - 只有单一类别时退化为整体随机切分(调用方应告警)
pub fn stratified_split(labels: &[usize], test_ratio: f64, seed: u64) -> SplitIndices {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut by_class: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (idx, label) in labels.iter().enumerate() {
        by_class.entry(*label).or_default().push(idx);
    }

    let mut train = Vec::new();
    let mut test = Vec::new();

    for (_, mut indices) in by_class {
        indices.shuffle(&mut rng);
        let n_test = allocate_test(indices.len(), test_ratio);
        test.extend_from_slice(&indices[..n_test]);
        train.extend_from_slice(&indices[n_test..]);
    }

    train.sort_unstable();
    test.sort_unstable();
    SplitIndices { train, test }
}

/// 单类内的测试份额: 四舍五入,n>=2 时夹在 [1, n-1]
fn allocate_test(n: usize, test_ratio: f64) -> usize {
    if n < 2 {
        return 0;
    }
    let raw = (n as f64 * test_ratio).round() as usize;
    raw.clamp(1, n - 1)
}
