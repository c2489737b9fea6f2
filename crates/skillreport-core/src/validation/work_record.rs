//! Record schema validation for bulk-uploaded work record rows
//!
//! Every row is checked independently. Blocking problems (missing required cells,
//! unparseable values, out-of-range numbers) make the row `ERROR`; recommended-but-missing
//! data makes an otherwise valid row `WARNING`.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{
    FieldError, NewWorkRecord, ProjectStatus, RowStatus, ValidationResultItem, ValidationSummary,
    WorkRecordRow,
};

const MAX_PROJECT_NAME: usize = 200;
const MAX_PROJECT_CODE: usize = 50;
const MAX_ROLE_TITLE: usize = 100;
const MAX_CLIENT_NAME: usize = 200;

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

/// Parse `YYYY-MM-DD` or `YYYY/MM/DD`
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn required<'a>(
    value: &'a str,
    field: &str,
    message: &str,
    errors: &mut Vec<FieldError>,
) -> Option<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        errors.push(FieldError::new(field, message));
        None
    } else {
        Some(value)
    }
}

fn check_length(
    value: Option<&str>,
    max: usize,
    field: &str,
    message: &str,
    errors: &mut Vec<FieldError>,
) {
    if let Some(v) = value {
        if v.chars().count() > max {
            errors.push(FieldError::new(field, message));
        }
    }
}

fn split_technologies(value: &str) -> Vec<String> {
    value
        .split([',', '、', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_rate(value: &str) -> Option<Decimal> {
    let value = value.trim().trim_end_matches(['%', '％']).trim();
    Decimal::from_str(value).ok()
}

/// Convert a raw row into a typed record, or every blocking error found
pub fn parse_record(row: &WorkRecordRow) -> Result<NewWorkRecord, Vec<FieldError>> {
    let mut errors = Vec::new();

    let project_name = required(
        &row.project_name,
        "project_name",
        "プロジェクト名は必須です",
        &mut errors,
    );
    check_length(
        project_name,
        MAX_PROJECT_NAME,
        "project_name",
        "プロジェクト名は200文字以内で入力してください",
        &mut errors,
    );

    let project_code = required(
        &row.project_code,
        "project_code",
        "プロジェクトコードは必須です",
        &mut errors,
    );
    check_length(
        project_code,
        MAX_PROJECT_CODE,
        "project_code",
        "プロジェクトコードは50文字以内で入力してください",
        &mut errors,
    );

    let client_name = optional(&row.client_name);
    check_length(
        client_name.as_deref(),
        MAX_CLIENT_NAME,
        "client_name",
        "クライアント名は200文字以内で入力してください",
        &mut errors,
    );

    let role_title = required(&row.role_title, "role_title", "役割は必須です", &mut errors);
    check_length(
        role_title,
        MAX_ROLE_TITLE,
        "role_title",
        "役割は100文字以内で入力してください",
        &mut errors,
    );

    let start_date = required(&row.start_date, "start_date", "開始日は必須です", &mut errors)
        .and_then(|value| {
            let parsed = parse_date(value);
            if parsed.is_none() {
                errors.push(FieldError::new(
                    "start_date",
                    "開始日はYYYY-MM-DDまたはYYYY/MM/DD形式で入力してください",
                ));
            }
            parsed
        });

    let end_date = optional(&row.end_date).and_then(|value| {
        let parsed = parse_date(&value);
        if parsed.is_none() {
            errors.push(FieldError::new(
                "end_date",
                "終了日はYYYY-MM-DDまたはYYYY/MM/DD形式で入力してください",
            ));
        }
        parsed
    });

    if let (Some(start), Some(end)) = (start_date, end_date) {
        if end < start {
            errors.push(FieldError::new(
                "end_date",
                "終了日は開始日以降の日付を指定してください",
            ));
        }
    }

    let participation_rate = optional(&row.participation_rate).and_then(|value| {
        match parse_rate(&value) {
            Some(rate) if rate >= Decimal::ZERO && rate <= Decimal::ONE_HUNDRED => Some(rate),
            _ => {
                errors.push(FieldError::new(
                    "participation_rate",
                    "参画率は0〜100の数値で入力してください",
                ));
                None
            }
        }
    });

    let team_size = optional(&row.team_size).and_then(|value| match value.parse::<i32>() {
        Ok(size) if size >= 1 => Some(size),
        _ => {
            errors.push(FieldError::new(
                "team_size",
                "チーム人数は1以上の整数で入力してください",
            ));
            None
        }
    });

    let status = required(&row.status, "status", "ステータスは必須です", &mut errors).and_then(
        |value| {
            let parsed = ProjectStatus::from_label(value);
            if parsed.is_none() {
                errors.push(FieldError::new(
                    "status",
                    "ステータスは計画中・進行中・完了・中断のいずれかを指定してください",
                ));
            }
            parsed
        },
    );

    match (project_name, project_code, role_title, start_date, status) {
        (Some(project_name), Some(project_code), Some(role_title), Some(start_date), Some(status))
            if errors.is_empty() =>
        {
            Ok(NewWorkRecord {
                project_name: project_name.to_string(),
                project_code: project_code.to_string(),
                client_name,
                role_title: role_title.to_string(),
                start_date,
                end_date,
                participation_rate,
                team_size,
                status,
                technologies: split_technologies(&row.technologies),
                responsibilities: optional(&row.responsibilities),
                achievements: optional(&row.achievements),
                description: optional(&row.description),
            })
        }
        _ => Err(errors),
    }
}

fn warnings(record: &NewWorkRecord) -> Vec<FieldError> {
    let mut warnings = Vec::new();
    if record.status == ProjectStatus::Completed && record.end_date.is_none() {
        warnings.push(FieldError::new(
            "end_date",
            "完了したプロジェクトには終了日の入力を推奨します",
        ));
    }
    if record.technologies.is_empty() {
        warnings.push(FieldError::new(
            "technologies",
            "使用技術が入力されていません",
        ));
    }
    warnings
}

/// Validate one data row. `row_number` is 1-based, excluding the header.
pub fn validate_row(row_number: usize, row: &WorkRecordRow) -> ValidationResultItem {
    let (status, errors) = match parse_record(row) {
        Err(errors) => (RowStatus::Error, errors),
        Ok(record) => {
            let warnings = warnings(&record);
            if warnings.is_empty() {
                (RowStatus::Ok, warnings)
            } else {
                (RowStatus::Warning, warnings)
            }
        }
    };

    ValidationResultItem {
        row: row_number,
        status,
        errors,
        data: row.clone(),
    }
}

/// Validate every numbered row in order and compute the summary
pub fn summarize(rows: &[(usize, WorkRecordRow)]) -> (Vec<ValidationResultItem>, ValidationSummary) {
    let items: Vec<ValidationResultItem> = rows
        .iter()
        .map(|(row_number, row)| validate_row(*row_number, row))
        .collect();
    let summary = ValidationSummary::from_items(&items);
    (items, summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_row() -> WorkRecordRow {
        WorkRecordRow {
            project_name: "基幹システム刷新".to_string(),
            project_code: "PRJ-001".to_string(),
            client_name: "ABC商事".to_string(),
            role_title: "リードエンジニア".to_string(),
            start_date: "2023-04-01".to_string(),
            end_date: "2024/03/31".to_string(),
            participation_rate: "80".to_string(),
            team_size: "6".to_string(),
            status: "完了".to_string(),
            technologies: "Rust, PostgreSQL、AWS".to_string(),
            responsibilities: "設計・実装".to_string(),
            achievements: String::new(),
            description: String::new(),
        }
    }

    #[test]
    fn test_valid_row_is_ok() {
        let item = validate_row(1, &valid_row());
        assert_eq!(item.status, RowStatus::Ok);
        assert!(item.errors.is_empty());
        assert_eq!(item.data, valid_row());
    }

    #[test]
    fn test_parse_record_types_fields() {
        let record = parse_record(&valid_row()).unwrap();
        assert_eq!(record.start_date, NaiveDate::from_ymd_opt(2023, 4, 1).unwrap());
        assert_eq!(record.end_date, NaiveDate::from_ymd_opt(2024, 3, 31));
        assert_eq!(record.participation_rate, Some(Decimal::from(80)));
        assert_eq!(record.team_size, Some(6));
        assert_eq!(record.status, ProjectStatus::Completed);
        assert_eq!(record.technologies, vec!["Rust", "PostgreSQL", "AWS"]);
        assert_eq!(record.achievements, None);
    }

    #[test]
    fn test_missing_start_date() {
        let mut row = valid_row();
        row.start_date = String::new();
        let item = validate_row(2, &row);
        assert_eq!(item.row, 2);
        assert_eq!(item.status, RowStatus::Error);
        assert_eq!(
            item.errors,
            vec![FieldError::new("start_date", "開始日は必須です")]
        );
    }

    #[test]
    fn test_all_required_fields_reported() {
        let item = validate_row(1, &WorkRecordRow {
            technologies: "Go".to_string(),
            ..Default::default()
        });
        let fields: Vec<&str> = item.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["project_name", "project_code", "role_title", "start_date", "status"]
        );
    }

    #[test]
    fn test_format_errors() {
        let mut row = valid_row();
        row.start_date = "2023.04.01".to_string();
        row.participation_rate = "120".to_string();
        row.team_size = "0".to_string();
        row.status = "done".to_string();
        let item = validate_row(1, &row);
        let fields: Vec<&str> = item.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["start_date", "participation_rate", "team_size", "status"]
        );
    }

    #[test]
    fn test_end_date_before_start_date() {
        let mut row = valid_row();
        row.end_date = "2023-03-31".to_string();
        let item = validate_row(1, &row);
        assert_eq!(item.status, RowStatus::Error);
        assert_eq!(item.errors[0].field, "end_date");
    }

    #[test]
    fn test_length_limits_count_characters() {
        let mut row = valid_row();
        row.project_name = "あ".repeat(200);
        assert_eq!(validate_row(1, &row).status, RowStatus::Ok);
        row.project_name = "あ".repeat(201);
        let item = validate_row(1, &row);
        assert_eq!(item.status, RowStatus::Error);
        assert_eq!(item.errors[0].field, "project_name");
    }

    #[test]
    fn test_warning_for_completed_without_end_date() {
        let mut row = valid_row();
        row.end_date = String::new();
        let item = validate_row(1, &row);
        assert_eq!(item.status, RowStatus::Warning);
        assert_eq!(item.errors[0].field, "end_date");
    }

    #[test]
    fn test_warning_for_empty_technologies() {
        let mut row = valid_row();
        row.technologies = " ".to_string();
        let item = validate_row(1, &row);
        assert_eq!(item.status, RowStatus::Warning);
        assert_eq!(item.errors[0].field, "technologies");
    }

    #[test]
    fn test_error_rows_carry_no_warnings() {
        let mut row = valid_row();
        row.end_date = String::new();
        row.technologies = String::new();
        row.project_code = String::new();
        let item = validate_row(1, &row);
        assert_eq!(item.status, RowStatus::Error);
        assert_eq!(item.errors.len(), 1);
    }

    #[test]
    fn test_rate_accepts_percent_sign() {
        let mut row = valid_row();
        row.participation_rate = "50%".to_string();
        let record = parse_record(&row).unwrap();
        assert_eq!(record.participation_rate, Some(Decimal::from(50)));
    }

    #[test]
    fn test_summarize_three_rows_one_error() {
        let mut missing = valid_row();
        missing.start_date = String::new();
        let rows = vec![(1, valid_row()), (2, missing), (3, valid_row())];
        let (items, summary) = summarize(&rows);

        assert_eq!(items.len(), 3);
        assert_eq!(summary.total_count, 3);
        assert_eq!(summary.success_count, 2);
        assert_eq!(summary.error_count, 1);
        assert_eq!(summary.success_rate, 66.7);
        assert_eq!(items[1].row, 2);
        assert_eq!(items[1].status, RowStatus::Error);
    }

    #[test]
    fn test_summarize_keeps_row_numbers_across_gaps() {
        let mut missing = valid_row();
        missing.start_date = String::new();
        // file row 2 was blank and never reached the validator
        let rows = vec![(1, valid_row()), (3, missing)];
        let (items, summary) = summarize(&rows);

        assert_eq!(summary.total_count, 2);
        assert_eq!(summary.error_count, 1);
        assert_eq!(items[1].row, 3);
        assert_eq!(items[1].status, RowStatus::Error);
    }
}
