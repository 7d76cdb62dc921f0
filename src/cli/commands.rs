// ==========================================
// 工业传感器监测系统 - 命令分发
// ==========================================
// 职责: 打开共享连接、组装仓储与引擎、执行子命令
// 红线: 出错就地汇报(anyhow),不做重试
// ==========================================

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use chrono::{Local, NaiveDateTime};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::config::{default_db_path, default_model_path, ConfigManager};
use crate::db::open_sqlite_connection;
use crate::domain::types::MachineQuality;
use crate::domain::{Machine, Sensor, SensorReading};
use crate::engine::{
    AlertService, MonitorParams, MonitorService, RandomForestParams, RiskModel, RuleModel,
    ScoringEngine, TrainingEngine,
};
use crate::repository::{
    ensure_schema, FailureEventRepository, MachineRepository, ReadingRepository, SensorRepository,
};
use crate::simulation::{
    generate_dataset, read_dataset, simulate_band_values, summarize, write_dataset,
};

use super::{
    Cli, CliCommands, ConfigCommands, DatasetCommands, MachineCommands, MonitorArgs,
    ReadingCommands, SensorCommands, TrainArgs,
};

/// 时间列的统一展示格式(与库内存储格式一致)
const TIME_FMT: &str = "%Y-%m-%d %H:%M:%S";

// ==========================================
// AppContext - 一次命令执行的持久化入口
// ==========================================
// 单连接进程: 所有仓储共享同一个 Arc<Mutex<Connection>>,
// 每次启动都幂等建表,老库新库走同一条路径
struct AppContext {
    machines: Arc<MachineRepository>,
    sensors: Arc<SensorRepository>,
    readings: Arc<ReadingRepository>,
    failures: Arc<FailureEventRepository>,
    config: ConfigManager,
    db_path: String,
    model_path: PathBuf,
}

impl AppContext {
    fn open(cli: &Cli) -> anyhow::Result<Self> {
        let db_path = cli.db.clone().unwrap_or_else(default_db_path);
        let model_path = cli
            .model
            .clone()
            .unwrap_or_else(|| PathBuf::from(default_model_path()));
        debug!(db = %db_path, model = %model_path.display(), "解析运行路径");

        let conn = open_sqlite_connection(&db_path)
            .with_context(|| format!("无法打开数据库: {}", db_path))?;
        ensure_schema(&conn).context("初始化表结构失败")?;

        let conn = Arc::new(Mutex::new(conn));
        let config = ConfigManager::from_connection(conn.clone())
            .map_err(|e| anyhow!("初始化配置管理器失败: {}", e))?;

        Ok(AppContext {
            machines: Arc::new(MachineRepository::from_connection(conn.clone())),
            sensors: Arc::new(SensorRepository::from_connection(conn.clone())),
            readings: Arc::new(ReadingRepository::from_connection(conn.clone())),
            failures: Arc::new(FailureEventRepository::from_connection(conn)),
            config,
            db_path,
            model_path,
        })
    }
}

/// 执行一条已解析的命令
pub fn execute(cli: Cli) -> anyhow::Result<()> {
    let ctx = AppContext::open(&cli)?;

    match cli.command {
        CliCommands::Init => cmd_init(&ctx),
        CliCommands::Machine(args) => match args.command {
            MachineCommands::Add {
                name,
                quality,
                model,
            } => cmd_machine_add(&ctx, name, &quality, model),
            MachineCommands::List => cmd_machine_list(&ctx),
        },
        CliCommands::Sensor(args) => match args.command {
            SensorCommands::Add {
                machine_id,
                sensor_type,
                unit,
                min,
                max,
            } => cmd_sensor_add(&ctx, machine_id, sensor_type, unit, min, max),
            SensorCommands::List { machine_id } => cmd_sensor_list(&ctx, machine_id),
        },
        CliCommands::Reading(args) => match args.command {
            ReadingCommands::Add {
                sensor_id,
                value,
                at,
            } => cmd_reading_add(&ctx, sensor_id, value, at),
            ReadingCommands::Simulate {
                sensor_id,
                count,
                seed,
            } => cmd_reading_simulate(&ctx, sensor_id, count, seed),
            ReadingCommands::Latest { limit } => cmd_reading_latest(&ctx, limit),
            ReadingCommands::Clear { yes } => cmd_reading_clear(&ctx, yes),
        },
        CliCommands::Dataset(args) => match args.command {
            DatasetCommands::Generate {
                samples,
                seed,
                output,
            } => cmd_dataset_generate(samples, seed, &output),
            DatasetCommands::Import { input, summary } => cmd_dataset_import(&input, summary),
        },
        CliCommands::Train(args) => cmd_train(&ctx, &args),
        CliCommands::Score => cmd_score(&ctx),
        CliCommands::Monitor(args) => cmd_monitor(&ctx, &args),
        CliCommands::Config(args) => match args.command {
            ConfigCommands::Get { key } => cmd_config_get(&ctx, &key),
            ConfigCommands::Set { key, value } => cmd_config_set(&ctx, &key, &value),
            ConfigCommands::List => cmd_config_list(&ctx),
        },
    }
}

// ==========================================
// init
// ==========================================
fn cmd_init(ctx: &AppContext) -> anyhow::Result<()> {
    // 建表已在 AppContext::open 里完成,这里只补默认配置
    let seeded = ctx
        .config
        .seed_defaults()
        .map_err(|e| anyhow!("写入默认配置失败: {}", e))?;

    println!("数据库: {}", ctx.db_path);
    println!("模型工件: {}", ctx.model_path.display());
    println!("默认配置新写入 {} 项", seeded);
    Ok(())
}

// ==========================================
// machine
// ==========================================
fn cmd_machine_add(
    ctx: &AppContext,
    name: String,
    quality: &str,
    model: Option<String>,
) -> anyhow::Result<()> {
    let machine = Machine::new(name, MachineQuality::from_str(quality), model);
    let machine_id = ctx.machines.insert(&machine)?;
    println!("机器已登记: #{} {}", machine_id, machine.name);
    Ok(())
}

fn cmd_machine_list(ctx: &AppContext) -> anyhow::Result<()> {
    let machines = ctx.machines.list_all()?;
    if machines.is_empty() {
        println!("(没有机器)");
        return Ok(());
    }
    for m in &machines {
        println!(
            "#{:<4} {:<24} 质量等级={:<8} 型号={:<12} 状态={}",
            m.machine_id,
            m.name,
            m.quality,
            m.model.as_deref().unwrap_or("-"),
            m.status
        );
    }
    Ok(())
}

// ==========================================
// sensor
// ==========================================
fn cmd_sensor_add(
    ctx: &AppContext,
    machine_id: i64,
    sensor_type: String,
    unit: String,
    min: Option<f64>,
    max: Option<f64>,
) -> anyhow::Result<()> {
    if ctx.machines.find_by_id(machine_id)?.is_none() {
        bail!("机器不存在: #{}", machine_id);
    }
    if let (Some(lo), Some(hi)) = (min, max) {
        if lo >= hi {
            bail!("正常区间无效: 下限 {} 不小于上限 {}", lo, hi);
        }
    }

    let sensor = Sensor::new(sensor_type, unit, machine_id, min, max);
    let sensor_id = ctx.sensors.insert(&sensor)?;
    println!(
        "传感器已登记: #{} {} [{}] -> 机器 #{}",
        sensor_id, sensor.sensor_type, sensor.unit, machine_id
    );
    Ok(())
}

fn cmd_sensor_list(ctx: &AppContext, machine_id: Option<i64>) -> anyhow::Result<()> {
    let sensors = match machine_id {
        Some(id) => ctx.sensors.list_by_machine(id)?,
        None => ctx.sensors.list_all()?,
    };
    if sensors.is_empty() {
        println!("(没有传感器)");
        return Ok(());
    }
    for s in &sensors {
        println!(
            "#{:<4} {:<16} 单位={:<6} 区间=[{}, {}] 机器=#{}",
            s.sensor_id,
            s.sensor_type,
            s.unit,
            fmt_limit(s.min_limit),
            fmt_limit(s.max_limit),
            s.machine_id
        );
    }
    Ok(())
}

fn fmt_limit(limit: Option<f64>) -> String {
    match limit {
        Some(v) => format!("{:.1}", v),
        None => "-".to_string(),
    }
}

// ==========================================
// reading
// ==========================================
fn cmd_reading_add(
    ctx: &AppContext,
    sensor_id: i64,
    value: f64,
    at: Option<String>,
) -> anyhow::Result<()> {
    let recorded_at = match at {
        Some(text) => NaiveDateTime::parse_from_str(&text, TIME_FMT)
            .with_context(|| format!("无法解析采样时间(期望 {}): {}", TIME_FMT, text))?,
        None => Local::now().naive_local(),
    };

    let reading_id = ctx
        .readings
        .insert(&SensorReading::new(sensor_id, recorded_at, value))?;
    println!(
        "读数已入库: #{} 传感器 #{} 值 {:.3} @ {}",
        reading_id,
        sensor_id,
        value,
        recorded_at.format(TIME_FMT)
    );
    Ok(())
}

fn cmd_reading_simulate(
    ctx: &AppContext,
    sensor_id: i64,
    count: Option<usize>,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let sensor = ctx
        .sensors
        .find_by_id(sensor_id)?
        .ok_or_else(|| anyhow!("传感器不存在: #{}", sensor_id))?;

    let count = match count {
        Some(n) => n,
        None => ctx
            .config
            .get_default_simulate_count()
            .map_err(|e| anyhow!("读取模拟默认条数失败: {}", e))?,
    };
    if count == 0 {
        bail!("条数必须大于 0");
    }

    let mut rng = match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_os_rng(),
    };
    let values = simulate_band_values(&sensor, count, &mut rng);

    // 时间轴逐条 +1 秒,最新一条落在当前时刻
    let start = Local::now().naive_local() - chrono::Duration::seconds(count as i64 - 1);
    let readings: Vec<SensorReading> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            SensorReading::new(sensor_id, start + chrono::Duration::seconds(i as i64), v)
        })
        .collect();

    let inserted = ctx.readings.batch_insert(&readings)?;
    println!(
        "已模拟 {} 条读数 -> 传感器 #{} {}",
        inserted, sensor_id, sensor.sensor_type
    );
    Ok(())
}

fn cmd_reading_latest(ctx: &AppContext, limit: usize) -> anyhow::Result<()> {
    let details = ctx.readings.fetch_latest_details(limit)?;
    if details.is_empty() {
        println!("(没有读数)");
        return Ok(());
    }
    for d in &details {
        println!(
            "#{:<6} {} {:<16} {:>10.3} {:<6} 机器={:<16} 越限={}",
            d.reading_id,
            d.recorded_at.format(TIME_FMT),
            d.sensor_type,
            d.value,
            d.unit,
            d.machine_name,
            if d.is_out_of_range() { "是" } else { "否" }
        );
    }
    Ok(())
}

fn cmd_reading_clear(ctx: &AppContext, yes: bool) -> anyhow::Result<()> {
    let total = ctx.readings.count()?;
    if !yes {
        println!("将删除 {} 条读数,确认请加 --yes", total);
        return Ok(());
    }
    let deleted = ctx.readings.clear_all()?;
    println!("已清空读数: {} 条", deleted);
    Ok(())
}

// ==========================================
// dataset
// ==========================================
fn cmd_dataset_generate(samples: usize, seed: u64, output: &PathBuf) -> anyhow::Result<()> {
    let records = generate_dataset(samples, seed);
    write_dataset(output, &records)?;

    let stats = summarize(&records);
    println!("已生成 {} 行 -> {}", stats.total, output.display());
    println!(
        "故障行 {} ({:.1}%)",
        stats.failure_count,
        stats.failure_rate() * 100.0
    );
    Ok(())
}

fn cmd_dataset_import(input: &PathBuf, summary: bool) -> anyhow::Result<()> {
    let records = read_dataset(input)?;
    println!("已读入 {} 行 <- {}", records.len(), input.display());

    if summary {
        let stats = summarize(&records);
        println!(
            "故障行 {} ({:.1}%)",
            stats.failure_count,
            stats.failure_rate() * 100.0
        );
        for (kind, n) in &stats.kind_counts {
            println!("  {:<24} {}", kind.label(), n);
        }

        let dist = RuleModel::default().distribution(&records);
        println!(
            "规则分级: 低 {} / 中 {} / 高 {}",
            dist.low, dist.medium, dist.high
        );
    }
    Ok(())
}

// ==========================================
// train / score
// ==========================================
fn cmd_train(ctx: &AppContext, args: &TrainArgs) -> anyhow::Result<()> {
    if args.trees == 0 {
        bail!("树数必须大于 0");
    }
    let params = RandomForestParams {
        n_trees: args.trees,
        seed: args.seed,
        ..RandomForestParams::default()
    };

    let engine = TrainingEngine::new(ctx.readings.clone());
    let Some((model, report)) = engine.train(params)? else {
        println!("库内没有读数,未训练");
        return Ok(());
    };
    model.save(&ctx.model_path)?;

    println!(
        "训练完成: {} 棵树,样本 {} (训练 {} / 测试 {},越限 {})",
        args.trees, report.n_samples, report.n_train, report.n_test, report.n_positive
    );
    println!(
        "分层切分: {}",
        if report.stratified {
            "是"
        } else {
            "否(单一类别)"
        }
    );
    println!("准确率: {:.3}", report.metrics.accuracy);
    for c in &report.metrics.per_class {
        println!(
            "  类别 {}: 精确率 {:.3} 召回率 {:.3} F1 {:.3} 支持度 {}",
            c.class, c.precision, c.recall, c.f1, c.support
        );
    }
    match report.metrics.roc_auc {
        Some(auc) => println!("ROC-AUC: {:.3}", auc),
        None => println!("ROC-AUC: 不可用(测试集只有单一类别)"),
    }
    println!("模型已写入: {}", ctx.model_path.display());
    Ok(())
}

fn cmd_score(ctx: &AppContext) -> anyhow::Result<()> {
    let model = RiskModel::load(&ctx.model_path)?;
    let engine = ScoringEngine::new(ctx.readings.clone());
    let Some(score) = engine.score_latest(&model)? else {
        println!("库内没有读数,无可打分");
        return Ok(());
    };

    println!(
        "读数 #{}: {} = {:.3} {} ({} / 传感器 #{}) @ {}",
        score.reading_id,
        score.sensor_type,
        score.value,
        score.unit,
        score.machine_name,
        score.sensor_id,
        score.recorded_at.format(TIME_FMT)
    );
    println!(
        "故障概率: {:.3} 判类: {} 分档: {} 越限: {}",
        score.probability,
        score.predicted_label,
        score.severity,
        if score.out_of_range { "是" } else { "否" }
    );

    let threshold = ctx
        .config
        .get_probability_threshold()
        .map_err(|e| anyhow!("读取告警阈值失败: {}", e))?;
    let alert = AlertService::new(ctx.failures.clone());
    if let Some(failure_id) = alert.register_if_crossed(&score, threshold)? {
        println!(
            "概率越过阈值 {:.2},已登记故障事件 #{}",
            threshold, failure_id
        );
    }
    Ok(())
}

// ==========================================
// monitor
// ==========================================
fn cmd_monitor(ctx: &AppContext, args: &MonitorArgs) -> anyhow::Result<()> {
    let ticks = match args.ticks {
        Some(n) => n,
        None => ctx
            .config
            .get_default_ticks()
            .map_err(|e| anyhow!("读取巡检默认次数失败: {}", e))?,
    };
    if ticks == 0 {
        bail!("巡检次数必须大于 0");
    }
    let interval_secs = match args.interval_secs {
        Some(s) => s,
        None => ctx
            .config
            .get_tick_interval_secs()
            .map_err(|e| anyhow!("读取巡检间隔失败: {}", e))?,
    };

    if let Some(machine_id) = args.machine_id {
        if ctx.machines.find_by_id(machine_id)?.is_none() {
            bail!("机器不存在: #{}", machine_id);
        }
    }

    let params = MonitorParams {
        ticks,
        interval: Duration::from_secs(interval_secs),
        machine_id: args.machine_id,
        force_process_temp: args.force_process_temp,
        force_tool_wear: args.force_tool_wear,
        seed: args.seed,
    };
    let service = match args.machine_id {
        Some(_) => MonitorService::with_failure_log(RuleModel::default(), ctx.failures.clone()),
        None => MonitorService::new(RuleModel::default()),
    };

    let summary = service
        .run(&params)
        .map_err(|e| anyhow!("巡检失败: {}", e))?;

    println!(
        "巡检 {} 次: 低 {} / 中 {} / 高 {},登记故障事件 {} 条",
        summary.ticks_run,
        summary.distribution.low,
        summary.distribution.medium,
        summary.distribution.high,
        summary.failures_recorded
    );
    Ok(())
}

// ==========================================
// config
// ==========================================
fn cmd_config_get(ctx: &AppContext, key: &str) -> anyhow::Result<()> {
    match ctx
        .config
        .get(key)
        .map_err(|e| anyhow!("读取配置失败: {}", e))?
    {
        Some(value) => println!("{}", value),
        None => println!("(未设置)"),
    }
    Ok(())
}

fn cmd_config_set(ctx: &AppContext, key: &str, value: &str) -> anyhow::Result<()> {
    ctx.config
        .set(key, value)
        .map_err(|e| anyhow!("写入配置失败: {}", e))?;
    println!("{} = {}", key, value);
    Ok(())
}

fn cmd_config_list(ctx: &AppContext) -> anyhow::Result<()> {
    let entries = ctx
        .config
        .list_all()
        .map_err(|e| anyhow!("读取配置失败: {}", e))?;
    if entries.is_empty() {
        println!("(没有配置项,先运行 init 写入默认值)");
        return Ok(());
    }
    for (key, value) in &entries {
        println!("{:<32} {}", key, value);
    }
    Ok(())
}
