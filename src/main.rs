// ==========================================
// 工业传感器监测系统 - 命令行主入口
// ==========================================
// 技术栈: Rust + SQLite + clap
// 系统定位: 读数采集、故障风险预测与巡检告警
// ==========================================

use clap::Parser;

use sensor_monitor::cli::{execute, Cli};
use sensor_monitor::logging;

fn main() {
    // 初始化日志系统(RUST_LOG 控制级别,日志走 stderr,stdout 留给命令输出)
    logging::init();

    let cli = Cli::parse();
    if let Err(err) = execute(cli) {
        tracing::error!("命令执行失败: {:#}", err);
        std::process::exit(1);
    }
}
