//! Upload files for bulk pipeline tests.

use axum_test::multipart::{MultipartForm, Part};

pub const HEADER: &str = "プロジェクト名,プロジェクトコード,役割,開始日,終了日,ステータス,使用技術";

/// CSV body from the header and data lines
pub fn csv(lines: &[&str]) -> Vec<u8> {
    let mut body = String::from(HEADER);
    for line in lines {
        body.push('\n');
        body.push_str(line);
    }
    body.push('\n');
    body.into_bytes()
}

/// Three rows, the second without a start date
pub fn csv_with_missing_start_date() -> Vec<u8> {
    csv(&[
        "基幹システム刷新,PRJ-001,PL,2023-04-01,2024-03-31,完了,Rust",
        "会計システム保守,PRJ-002,SE,,2024-03-31,完了,Java",
        "物流API開発,PRJ-003,PG,2024/04/01,,進行中,Go",
    ])
}

/// Rows that all pass validation, one per project code
pub fn valid_csv(codes: &[&str]) -> Vec<u8> {
    let lines: Vec<String> = codes
        .iter()
        .map(|code| format!("案件{code},{code},SE,2024-01-01,2024-06-30,完了,Rust"))
        .collect();
    let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
    csv(&refs)
}

pub fn file_form(data: Vec<u8>, file_name: &str, mime: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(data).file_name(file_name).mime_type(mime),
    )
}

pub fn csv_form(data: Vec<u8>) -> MultipartForm {
    file_form(data, "work_records.csv", "text/csv")
}
