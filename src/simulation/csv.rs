// ==========================================
// 工业传感器监测系统 - 数据集 CSV 读写
// ==========================================
// 红线: 表头固定 10 列,沿用巴西工厂数据集的葡语列名
// 说明: 导入按列位置解析,表头行跳过不校验
// ==========================================

use crate::domain::dataset::SyntheticRecord;
use crate::domain::types::{FailureKind, QualityGrade};
use crate::simulation::error::{ImportError, ImportResult};
use csv::ReaderBuilder;
use std::path::Path;

/// 数据集固定表头(列顺序即导入顺序)
pub const DATASET_HEADERS: [&str; 10] = [
    "ID Unico",
    "ID Produto",
    "Tipo",
    "Temperatura do ar [K]",
    "Temperatura do processo [K]",
    "Velocidade de rotação [rpm]",
    "Torque [Nm]",
    "Desgaste ferramenta [min]",
    "Falhou",
    "Tipo de falha",
];

/// 导出数据集为 CSV
///
/// # 参数
/// - path: 输出文件路径
/// - records: 数据行
pub fn write_dataset(path: &Path, records: &[SyntheticRecord]) -> ImportResult<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(DATASET_HEADERS)?;

    for record in records {
        writer.write_record([
            record.udi.to_string(),
            record.product_id.clone(),
            record.product_class.code().to_string(),
            record.air_temp_k.to_string(),
            record.process_temp_k.to_string(),
            record.rotation_rpm.to_string(),
            record.torque_nm.to_string(),
            record.tool_wear_min.to_string(),
            if record.failed { "1" } else { "0" }.to_string(),
            record.failure_kind.label().to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// 从 CSV 导入数据集
///
/// # 参数
/// - path: 输入文件路径
///
/// # 返回
/// - Ok(Vec<SyntheticRecord>): 全部数据行
/// - Err(ImportError): 文件缺失/列数不符/字段解析失败(带行号)
pub fn read_dataset(path: &Path) -> ImportResult<Vec<SyntheticRecord>> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // 行长度差异由逐行校验报出,带行号
        .from_path(path)?;

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // 表头占第 1 行,数据行从第 2 行起
        let row = idx + 2;
        let record = result?;

        if record.len() != DATASET_HEADERS.len() {
            return Err(ImportError::ColumnCount {
                row,
                expected: DATASET_HEADERS.len(),
                found: record.len(),
            });
        }

        records.push(parse_row(row, &record)?);
    }

    Ok(records)
}

/// 解析单行(按列位置)
fn parse_row(row: usize, record: &csv::StringRecord) -> ImportResult<SyntheticRecord> {
    let udi = parse_u32(row, 0, record)?;
    let product_id = record[1].trim().to_string();
    let product_class = QualityGrade::parse(&record[2]).ok_or_else(|| ImportError::FieldParse {
        row,
        column: DATASET_HEADERS[2].to_string(),
        message: format!("无法识别的质量等级: {:?}", record[2].trim()),
    })?;
    let air_temp_k = parse_f64(row, 3, record)?;
    let process_temp_k = parse_f64(row, 4, record)?;
    let rotation_rpm = parse_f64(row, 5, record)?;
    let torque_nm = parse_f64(row, 6, record)?;
    let tool_wear_min = parse_u32(row, 7, record)?;
    let failed = match record[8].trim() {
        "0" => false,
        "1" => true,
        other => {
            return Err(ImportError::FieldParse {
                row,
                column: DATASET_HEADERS[8].to_string(),
                message: format!("故障标记只接受 0/1,实际 {:?}", other),
            })
        }
    };
    let failure_kind =
        FailureKind::parse(&record[9]).ok_or_else(|| ImportError::FieldParse {
            row,
            column: DATASET_HEADERS[9].to_string(),
            message: format!("无法识别的故障类型: {:?}", record[9].trim()),
        })?;

    Ok(SyntheticRecord {
        udi,
        product_id,
        product_class,
        air_temp_k,
        process_temp_k,
        rotation_rpm,
        torque_nm,
        tool_wear_min,
        failed,
        failure_kind,
    })
}

fn parse_f64(row: usize, col: usize, record: &csv::StringRecord) -> ImportResult<f64> {
    record[col]
        .trim()
        .parse::<f64>()
        .map_err(|e| ImportError::FieldParse {
            row,
            column: DATASET_HEADERS[col].to_string(),
            message: format!("{}: {:?}", e, record[col].trim()),
        })
}

fn parse_u32(row: usize, col: usize, record: &csv::StringRecord) -> ImportResult<u32> {
    record[col]
        .trim()
        .parse::<u32>()
        .map_err(|e| ImportError::FieldParse {
            row,
            column: DATASET_HEADERS[col].to_string(),
            message: format!("{}: {:?}", e, record[col].trim()),
        })
}
