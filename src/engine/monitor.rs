// ==========================================
// 工业传感器监测系统 - 监测巡检服务
// ==========================================
// 职责: 按固定次数与间隔模拟工况并做规则分级,
//       高风险命中时登记故障事件
// 红线: 巡检必须有界,禁止无限循环
// ==========================================

use crate::domain::failure::FailureEvent;
use crate::domain::types::RiskLevel;
use crate::engine::rules::{RuleDistribution, RuleModel, RuleVerdict};
use crate::repository::failure_repo::FailureEventRepository;
use crate::simulation::reading_sim::monitor_tick_record;
use chrono::Local;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// 巡检参数
#[derive(Debug, Clone)]
pub struct MonitorParams {
    pub ticks: usize,                    // 巡检次数
    pub interval: Duration,              // 相邻两次的间隔
    pub machine_id: Option<i64>,         // 故障事件登记到哪台机器
    pub force_process_temp: Option<f64>, // 演示用: 强制工艺温度
    pub force_tool_wear: Option<u32>,    // 演示用: 强制刀具磨损
    pub seed: u64,                       // 工况模拟种子
}

impl Default for MonitorParams {
    fn default() -> Self {
        MonitorParams {
            ticks: 10,
            interval: Duration::from_secs(20),
            machine_id: None,
            force_process_temp: None,
            force_tool_wear: None,
            seed: 42,
        }
    }
}

/// 单次巡检结果
#[derive(Debug, Clone)]
pub struct TickOutcome {
    pub tick: usize,
    pub product_id: String,
    pub verdict: RuleVerdict,
}

/// 整轮巡检汇总
#[derive(Debug, Clone)]
pub struct MonitorSummary {
    pub ticks_run: usize,
    pub distribution: RuleDistribution,
    pub failures_recorded: usize,
    pub outcomes: Vec<TickOutcome>,
}

// ==========================================
// MonitorService - 巡检服务
// ==========================================
pub struct MonitorService {
    rules: RuleModel,
    failure_repo: Option<Arc<FailureEventRepository>>,
}

impl MonitorService {
    /// 只分级不落库的巡检服务
    pub fn new(rules: RuleModel) -> Self {
        Self {
            rules,
            failure_repo: None,
        }
    }

    /// 带故障事件登记的巡检服务
    pub fn with_failure_log(rules: RuleModel, failure_repo: Arc<FailureEventRepository>) -> Self {
        Self {
            rules,
            failure_repo: Some(failure_repo),
        }
    }

    /// 执行一轮有界巡检
    ///
    /// # 说明
    /// - 每次巡检: 模拟一条工况 -> 规则分级 -> 记录结果
    /// - 高风险且指定了机器时写入 failure_events;未指定机器只告警
    /// - interval 为零时不等待(测试与一次性巡检用)
    pub fn run(&self, params: &MonitorParams) -> Result<MonitorSummary, Box<dyn Error>> {
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
        let mut distribution = RuleDistribution::default();
        let mut failures_recorded = 0usize;
        let mut outcomes = Vec::with_capacity(params.ticks);

        info!(
            ticks = params.ticks,
            interval_secs = params.interval.as_secs(),
            machine_id = ?params.machine_id,
            "开始巡检"
        );

        for tick in 1..=params.ticks {
            let mut record = monitor_tick_record(tick as u32, &mut rng);
            if let Some(temp) = params.force_process_temp {
                record.process_temp_k = temp;
            }
            if let Some(wear) = params.force_tool_wear {
                record.tool_wear_min = wear;
            }

            let verdict = self.rules.evaluate(&record);
            match verdict.level {
                RiskLevel::Low => {
                    distribution.low += 1;
                    info!(tick, product_id = %record.product_id, "工况正常");
                }
                RiskLevel::Medium => {
                    distribution.medium += 1;
                    warn!(
                        tick,
                        product_id = %record.product_id,
                        reasons = ?verdict.reasons,
                        "中风险工况"
                    );
                }
                RiskLevel::High => {
                    distribution.high += 1;
                    warn!(
                        tick,
                        product_id = %record.product_id,
                        reasons = ?verdict.reasons,
                        "高风险工况"
                    );
                    failures_recorded += self.record_failure(params.machine_id, &verdict)?;
                }
            }

            outcomes.push(TickOutcome {
                tick,
                product_id: record.product_id.clone(),
                verdict,
            });

            if tick < params.ticks && !params.interval.is_zero() {
                std::thread::sleep(params.interval);
            }
        }

        info!(
            ticks_run = params.ticks,
            high = distribution.high,
            failures_recorded,
            "巡检结束"
        );
        Ok(MonitorSummary {
            ticks_run: params.ticks,
            distribution,
            failures_recorded,
            outcomes,
        })
    }

    /// 高风险命中时登记故障事件,返回实际落库条数
    fn record_failure(
        &self,
        machine_id: Option<i64>,
        verdict: &RuleVerdict,
    ) -> Result<usize, Box<dyn Error>> {
        let repo = match (&self.failure_repo, machine_id) {
            (Some(repo), Some(_)) => repo,
            _ => return Ok(0),
        };
        let machine_id = match machine_id {
            Some(id) => id,
            None => return Ok(0),
        };

        let event = FailureEvent::new(
            machine_id,
            None,
            verdict.reasons.join("; "),
            RiskLevel::High,
            Local::now().naive_local(),
        );
        repo.insert(&event)?;
        Ok(1)
    }
}
