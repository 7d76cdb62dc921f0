// ==========================================
// 工业传感器监测系统 - 命令行界面
// ==========================================
// 职责: clap 命令定义与参数解析
// 红线: CLI 只做解析与输出,业务逻辑在 engine/repository
// ==========================================

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub mod commands;

pub use commands::execute;

/// 工业传感器监测系统命令行
#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "工业传感器监测系统: 读数采集、故障预测与巡检告警",
    long_about = None
)]
pub struct Cli {
    /// SQLite 数据库路径(缺省: SENSOR_MONITOR_DB 或平台数据目录)
    #[arg(long, value_name = "PATH")]
    pub db: Option<String>,

    /// 模型工件路径(缺省: SENSOR_MONITOR_MODEL 或平台数据目录)
    #[arg(long, value_name = "PATH")]
    pub model: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommands,
}

#[derive(Debug, Subcommand)]
pub enum CliCommands {
    /// 初始化数据库表结构并写入默认配置
    Init,
    /// 机器台账
    Machine(MachineArgs),
    /// 传感器台账
    Sensor(SensorArgs),
    /// 传感器读数录入与查询
    Reading(ReadingArgs),
    /// 合成数据集生成与导入
    Dataset(DatasetArgs),
    /// 用库内读数训练故障预测模型
    Train(TrainArgs),
    /// 用已训练模型为最新一条读数打分
    Score,
    /// 有界巡检循环(持续监测交给外部调度器,如 cron)
    Monitor(MonitorArgs),
    /// 运行时配置(config_kv)
    Config(ConfigArgs),
}

// ==========================================
// machine 子命令
// ==========================================
#[derive(Debug, Args)]
pub struct MachineArgs {
    #[command(subcommand)]
    pub command: MachineCommands,
}

#[derive(Debug, Subcommand)]
pub enum MachineCommands {
    /// 登记一台机器
    Add {
        /// 机器名称
        #[arg(long)]
        name: String,

        /// 质量等级
        #[arg(long, default_value = "HIGH", value_parser = ["LOW", "MEDIUM", "HIGH"])]
        quality: String,

        /// 机器型号(可选)
        #[arg(long)]
        model: Option<String>,
    },
    /// 列出全部机器
    List,
}

// ==========================================
// sensor 子命令
// ==========================================
#[derive(Debug, Args)]
pub struct SensorArgs {
    #[command(subcommand)]
    pub command: SensorCommands,
}

#[derive(Debug, Subcommand)]
pub enum SensorCommands {
    /// 给机器挂一个传感器
    Add {
        /// 所属机器 ID
        #[arg(long)]
        machine_id: i64,

        /// 传感器类型(如 Temperatura)
        #[arg(long = "type", value_name = "TYPE")]
        sensor_type: String,

        /// 计量单位(如 C)
        #[arg(long)]
        unit: String,

        /// 正常区间下限(可选,缺失则不参与越限标注)
        #[arg(long)]
        min: Option<f64>,

        /// 正常区间上限(可选)
        #[arg(long)]
        max: Option<f64>,
    },
    /// 列出传感器(可按机器过滤)
    List {
        /// 只看这台机器
        #[arg(long)]
        machine_id: Option<i64>,
    },
}

// ==========================================
// reading 子命令
// ==========================================
#[derive(Debug, Args)]
pub struct ReadingArgs {
    #[command(subcommand)]
    pub command: ReadingCommands,
}

#[derive(Debug, Subcommand)]
pub enum ReadingCommands {
    /// 手工录入一条读数
    Add {
        /// 传感器 ID
        #[arg(long)]
        sensor_id: i64,

        /// 采样值
        #[arg(long)]
        value: f64,

        /// 采样时间 YYYY-MM-DD HH:MM:SS(缺省取当前时间)
        #[arg(long, value_name = "TIME")]
        at: Option<String>,
    },
    /// 在传感器正常区间附近批量模拟读数
    Simulate {
        /// 传感器 ID
        #[arg(long)]
        sensor_id: i64,

        /// 条数(缺省读配置 simulate/default_count)
        #[arg(long)]
        count: Option<usize>,

        /// 随机种子(缺省走系统熵,不可复现)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// 最新读数明细(机器×传感器联查)
    Latest {
        /// 最多多少条
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// 清空全部读数
    Clear {
        /// 确认删除(不带则只预览)
        #[arg(long)]
        yes: bool,
    },
}

// ==========================================
// dataset 子命令
// ==========================================
#[derive(Debug, Args)]
pub struct DatasetArgs {
    #[command(subcommand)]
    pub command: DatasetCommands,
}

#[derive(Debug, Subcommand)]
pub enum DatasetCommands {
    /// 生成确定性合成数据集并写出 CSV
    Generate {
        /// 行数
        #[arg(long, default_value_t = 1000)]
        samples: usize,

        /// 随机种子
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// 输出 CSV 路径
        #[arg(long, value_name = "PATH")]
        output: PathBuf,
    },
    /// 读入数据集 CSV 并汇报(不写数据库)
    Import {
        /// 输入 CSV 路径
        #[arg(long, value_name = "PATH")]
        input: PathBuf,

        /// 额外输出故障率与规则分级分布
        #[arg(long)]
        summary: bool,
    },
}

// ==========================================
// train / monitor 参数
// ==========================================
#[derive(Debug, Args)]
pub struct TrainArgs {
    /// 训练种子(切分/装袋/特征抽样共用)
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// 森林树数
    #[arg(long, default_value_t = 100)]
    pub trees: usize,
}

#[derive(Debug, Args)]
pub struct MonitorArgs {
    /// 巡检次数(缺省读配置 monitor/default_ticks)
    #[arg(long)]
    pub ticks: Option<usize>,

    /// 相邻两次间隔秒数(缺省读配置 monitor/tick_interval_secs)
    #[arg(long)]
    pub interval_secs: Option<u64>,

    /// 高风险时故障事件登记到这台机器
    #[arg(long)]
    pub machine_id: Option<i64>,

    /// 演示用: 强制工艺温度 [K]
    #[arg(long, value_name = "K")]
    pub force_process_temp: Option<f64>,

    /// 演示用: 强制刀具磨损 [min]
    #[arg(long, value_name = "MIN")]
    pub force_tool_wear: Option<u32>,

    /// 工况模拟种子
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

// ==========================================
// config 子命令
// ==========================================
#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// 读取一个配置键
    Get {
        /// 配置键(如 alert/probability_threshold)
        key: String,
    },
    /// 写入一个配置键
    Set {
        key: String,
        value: String,
    },
    /// 列出全部配置
    List,
}
