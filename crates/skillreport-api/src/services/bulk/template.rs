//! Downloadable work-record templates

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use skillreport_core::models::WORK_RECORD_COLUMNS;
use skillreport_core::AppError;

pub const TEMPLATE_SHEET_NAME: &str = "work_records";

const EXAMPLE_ROW: [&str; 13] = [
    "基幹システム刷新",
    "PRJ-2023-001",
    "ABC商事株式会社",
    "リードエンジニア",
    "2023-04-01",
    "2024-03-31",
    "80",
    "6",
    "完了",
    "Rust, PostgreSQL, AWS",
    "基本設計・実装・コードレビュー",
    "夜間バッチの処理時間を50%短縮",
    "受発注システムのリプレース",
];

/// Columns written as numbers in the Excel template
const NUMERIC_COLUMNS: [&str; 2] = ["participation_rate", "team_size"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateFormat {
    Csv,
    Xlsx,
}

impl TemplateFormat {
    pub fn parse(value: Option<&str>) -> Result<Self, AppError> {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            None | Some("") | Some("csv") => Ok(TemplateFormat::Csv),
            Some("xlsx") | Some("excel") => Ok(TemplateFormat::Xlsx),
            Some(other) => Err(AppError::InvalidParameter(format!(
                "format は csv または xlsx を指定してください: {}",
                other
            ))),
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            TemplateFormat::Csv => "text/csv; charset=utf-8",
            TemplateFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            TemplateFormat::Csv => "work_record_template.csv",
            TemplateFormat::Xlsx => "work_record_template.xlsx",
        }
    }

    pub fn render(&self) -> Result<Vec<u8>, AppError> {
        match self {
            TemplateFormat::Csv => csv_template(),
            TemplateFormat::Xlsx => xlsx_template(),
        }
    }
}

/// UTF-8 CSV with a BOM so Excel opens the Japanese headers correctly
pub fn csv_template() -> Result<Vec<u8>, AppError> {
    let write_failed =
        |e: csv::Error| AppError::Internal(format!("Failed to write CSV template: {}", e));

    let mut writer = csv::Writer::from_writer(vec![0xEF, 0xBB, 0xBF]);
    writer
        .write_record(WORK_RECORD_COLUMNS.iter().map(|(_, label)| *label))
        .map_err(write_failed)?;
    writer.write_record(EXAMPLE_ROW).map_err(write_failed)?;
    writer
        .into_inner()
        .map_err(|e| AppError::Internal(format!("Failed to flush CSV template: {}", e)))
}

pub fn xlsx_template() -> Result<Vec<u8>, AppError> {
    build_workbook()
        .map_err(|e| AppError::Internal(format!("Failed to build Excel template: {}", e)))
}

fn build_workbook() -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(TEMPLATE_SHEET_NAME)?;

    for (col, ((key, label), example)) in WORK_RECORD_COLUMNS.iter().zip(EXAMPLE_ROW).enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, *label, &header_format)?;
        match example.parse::<f64>() {
            Ok(number) if NUMERIC_COLUMNS.contains(key) => {
                sheet.write_number(1, col, number)?;
            }
            _ => {
                sheet.write_string(1, col, example)?;
            }
        }
        sheet.set_column_width(col, 18)?;
    }
    sheet.set_freeze_panes(1, 0)?;

    workbook.save_to_buffer()
}
