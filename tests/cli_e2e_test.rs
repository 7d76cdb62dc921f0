// ==========================================
// 命令行端到端测试
// ==========================================
// 测试目标: execute() 从已解析参数到落库/落盘的完整链路
// ==========================================

mod test_helpers;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use sensor_monitor::cli::{
    execute, Cli, CliCommands, ConfigArgs, ConfigCommands, DatasetArgs, DatasetCommands,
    MachineArgs, MachineCommands, ReadingArgs, ReadingCommands, SensorArgs, SensorCommands,
    TrainArgs,
};
use sensor_monitor::config::{config_keys, ConfigManager};
use sensor_monitor::domain::SensorReading;
use sensor_monitor::repository::{MachineRepository, ReadingRepository, SensorRepository};
use sensor_monitor::simulation::read_dataset;
use test_helpers::{create_test_db, seed_machine_with_sensor};

fn cli(db: &str, model: &Path, command: CliCommands) -> Cli {
    Cli {
        db: Some(db.to_string()),
        model: Some(model.to_path_buf()),
        command,
    }
}

#[test]
fn test_init_then_catalog_flow() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let model_path = PathBuf::from("unused_model.json");

    execute(cli(&db_path, &model_path, CliCommands::Init)).unwrap();

    execute(cli(
        &db_path,
        &model_path,
        CliCommands::Machine(MachineArgs {
            command: MachineCommands::Add {
                name: "Fresadora".to_string(),
                quality: "MEDIUM".to_string(),
                model: Some("FR-90".to_string()),
            },
        }),
    ))
    .unwrap();

    execute(cli(
        &db_path,
        &model_path,
        CliCommands::Sensor(SensorArgs {
            command: SensorCommands::Add {
                machine_id: 1,
                sensor_type: "Vibracao".to_string(),
                unit: "mm/s".to_string(),
                min: Some(0.0),
                max: Some(12.0),
            },
        }),
    ))
    .unwrap();

    execute(cli(
        &db_path,
        &model_path,
        CliCommands::Reading(ReadingArgs {
            command: ReadingCommands::Simulate {
                sensor_id: 1,
                count: Some(6),
                seed: Some(11),
            },
        }),
    ))
    .unwrap();

    // 落库校验
    let config = ConfigManager::new(&db_path).unwrap();
    assert!(config
        .get(config_keys::PROBABILITY_THRESHOLD)
        .unwrap()
        .is_some());
    assert_eq!(MachineRepository::new(&db_path).unwrap().count().unwrap(), 1);
    assert_eq!(SensorRepository::new(&db_path).unwrap().count().unwrap(), 1);
    assert_eq!(ReadingRepository::new(&db_path).unwrap().count().unwrap(), 6);
}

#[test]
fn test_train_then_score_writes_artifact() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let (_machine_id, sensor_id) = seed_machine_with_sensor(&db_path).expect("Failed to seed");

    // 四分之一越限,保证两类齐备
    let readings = ReadingRepository::new(&db_path).unwrap();
    let base = NaiveDate::from_ymd_opt(2024, 5, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap();
    let batch: Vec<SensorReading> = (0..40)
        .map(|i| {
            let value = if i % 4 == 0 { 130.0 } else { 40.0 + i as f64 };
            SensorReading::new(sensor_id, base + chrono::Duration::seconds(i as i64), value)
        })
        .collect();
    readings.batch_insert(&batch).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("risk_model.json");

    execute(cli(
        &db_path,
        &model_path,
        CliCommands::Train(TrainArgs { seed: 42, trees: 30 }),
    ))
    .unwrap();
    assert!(model_path.exists());

    execute(cli(&db_path, &model_path, CliCommands::Score)).unwrap();
}

#[test]
fn test_dataset_generate_import_cycle() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("unused_model.json");
    let csv_path = dir.path().join("ai4i_like.csv");

    execute(cli(
        &db_path,
        &model_path,
        CliCommands::Dataset(DatasetArgs {
            command: DatasetCommands::Generate {
                samples: 200,
                seed: 7,
                output: csv_path.clone(),
            },
        }),
    ))
    .unwrap();
    assert!(csv_path.exists());

    execute(cli(
        &db_path,
        &model_path,
        CliCommands::Dataset(DatasetArgs {
            command: DatasetCommands::Import {
                input: csv_path.clone(),
                summary: true,
            },
        }),
    ))
    .unwrap();

    // 导入只读不落库,文件内容保持 200 行
    let records = read_dataset(&csv_path).unwrap();
    assert_eq!(records.len(), 200);
    assert_eq!(ReadingRepository::new(&db_path).unwrap().count().unwrap(), 0);
}

#[test]
fn test_config_set_flows_to_typed_getter() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let model_path = PathBuf::from("unused_model.json");

    execute(cli(
        &db_path,
        &model_path,
        CliCommands::Config(ConfigArgs {
            command: ConfigCommands::Set {
                key: config_keys::TICK_INTERVAL_SECS.to_string(),
                value: "5".to_string(),
            },
        }),
    ))
    .unwrap();

    let config = ConfigManager::new(&db_path).unwrap();
    assert_eq!(config.get_tick_interval_secs().unwrap(), 5);
}

#[test]
fn test_reading_add_to_missing_sensor_fails() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let model_path = PathBuf::from("unused_model.json");

    let result = execute(cli(
        &db_path,
        &model_path,
        CliCommands::Reading(ReadingArgs {
            command: ReadingCommands::Add {
                sensor_id: 99,
                value: 1.0,
                at: Some("2024-05-01 08:00:00".to_string()),
            },
        }),
    ));
    assert!(result.is_err());
}
