//! Read an uploaded CSV or Excel file into ordered work-record rows

use std::io::Cursor;

use calamine::{open_workbook_from_rs, Data, Reader, Xls, Xlsx};
use skillreport_core::models::{
    work_record_column_key, WorkRecordRow, REQUIRED_WORK_RECORD_COLUMNS, WORK_RECORD_COLUMNS,
};
use skillreport_core::AppError;

use crate::utils::FileKind;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Header row plus data rows, cells as text
struct Table {
    headers: Vec<String>,
    records: Vec<Vec<String>>,
}

/// Parse the file body into rows, in file order, blank rows dropped.
///
/// Each row is paired with its 1-based data row number in the file (the header
/// is not counted), so skipped blank rows still advance the numbering.
///
/// Fails with `FILE_PARSE_ERROR` when the file is unreadable, a required
/// column is missing, or the data row count is zero or above `max_rows`.
pub fn parse_rows(
    kind: FileKind,
    data: &[u8],
    max_rows: usize,
) -> Result<Vec<(usize, WorkRecordRow)>, AppError> {
    let table = match kind {
        FileKind::Csv => read_csv(data)?,
        FileKind::Xlsx => read_workbook::<Xlsx<Cursor<Vec<u8>>>>(data)?,
        FileKind::Xls => read_workbook::<Xls<Cursor<Vec<u8>>>>(data)?,
    };
    table.into_rows(max_rows)
}

impl Table {
    fn into_rows(self, max_rows: usize) -> Result<Vec<(usize, WorkRecordRow)>, AppError> {
        let columns: Vec<Option<&'static str>> = self
            .headers
            .iter()
            .map(|header| work_record_column_key(header))
            .collect();

        let missing: Vec<&str> = REQUIRED_WORK_RECORD_COLUMNS
            .iter()
            .filter(|key| !columns.contains(&Some(**key)))
            .map(|key| column_label(key))
            .collect();
        if !missing.is_empty() {
            return Err(AppError::FileParse(format!(
                "必須の列が見つかりません: {}",
                missing.join(", ")
            )));
        }

        let rows: Vec<(usize, WorkRecordRow)> = self
            .records
            .into_iter()
            .enumerate()
            .map(|(idx, cells)| {
                let mut row = WorkRecordRow::default();
                for (key, cell) in columns.iter().zip(cells) {
                    if let Some(key) = key {
                        row.set(key, cell);
                    }
                }
                (idx + 1, row)
            })
            .filter(|(_, row)| !row.is_blank())
            .collect();

        if rows.is_empty() {
            return Err(AppError::FileParse(
                "ファイルにデータ行がありません".to_string(),
            ));
        }
        if rows.len() > max_rows {
            return Err(AppError::FileParse(format!(
                "一度に登録できるのは{}件までです（{}件）",
                max_rows,
                rows.len()
            )));
        }
        Ok(rows)
    }
}

fn column_label(key: &str) -> &str {
    WORK_RECORD_COLUMNS
        .iter()
        .find(|(column, _)| *column == key)
        .map(|(_, label)| *label)
        .unwrap_or(key)
}

fn read_csv(data: &[u8]) -> Result<Table, AppError> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let text = std::str::from_utf8(data).map_err(|_| {
        AppError::FileParse("CSVファイルはUTF-8で保存してください".to_string())
    })?;

    let csv_error =
        |e: csv::Error| AppError::FileParse(format!("CSVファイルを読み込めません: {}", e));

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(str::to_string)
        .collect();
    let records = reader
        .records()
        .map(|record| record.map(|r| r.iter().map(str::to_string).collect()))
        .collect::<Result<Vec<Vec<String>>, csv::Error>>()
        .map_err(csv_error)?;

    Ok(Table { headers, records })
}

fn read_workbook<R>(data: &[u8]) -> Result<Table, AppError>
where
    R: Reader<Cursor<Vec<u8>>>,
    R::Error: std::fmt::Display,
{
    let unreadable =
        |e: R::Error| AppError::FileParse(format!("Excelファイルを読み込めません: {}", e));

    let mut workbook: R = open_workbook_from_rs(Cursor::new(data.to_vec())).map_err(unreadable)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::FileParse("ワークシートが見つかりません".to_string()))?
        .map_err(unreadable)?;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .map(|cells| cells.iter().map(cell_text).collect())
        .unwrap_or_default();
    let records = rows
        .map(|cells| cells.iter().map(cell_text).collect())
        .collect();

    Ok(Table { headers, records })
}

/// Render a cell the way a user typed it; date cells become `YYYY-MM-DD`
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => (*f as i64).to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.date().format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| dt.as_f64().to_string()),
        Data::DateTimeIso(s) => s.get(..10).unwrap_or(s).to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

    const HEADER_JA: &str = "プロジェクト名,プロジェクトコード,クライアント名,役割,開始日,終了日,参画率,チーム人数,ステータス,使用技術";

    fn csv_bytes(lines: &[&str]) -> Vec<u8> {
        lines.join("\n").into_bytes()
    }

    #[test]
    fn test_csv_with_bom_and_japanese_headers() {
        let mut data = UTF8_BOM.to_vec();
        data.extend(csv_bytes(&[
            HEADER_JA,
            "基幹システム刷新,PRJ-001,ABC商事,PL,2023-04-01,2024-03-31,80,6,完了,\"Rust, PostgreSQL\"",
        ]));

        let rows = parse_rows(FileKind::Csv, &data, 100).unwrap();
        assert_eq!(rows.len(), 1);
        let (row_number, row) = &rows[0];
        assert_eq!(*row_number, 1);
        assert_eq!(row.project_name, "基幹システム刷新");
        assert_eq!(row.technologies, "Rust, PostgreSQL");
        assert_eq!(row.status, "完了");
        assert_eq!(row.description, "");
    }

    #[test]
    fn test_csv_with_english_keys_and_column_order() {
        let data = csv_bytes(&[
            "status,start_date,role_title,project_code,project_name",
            "completed,2023-04-01,SE,P-1,Portal",
        ]);
        let rows = parse_rows(FileKind::Csv, &data, 100).unwrap();
        assert_eq!(rows[0].1.project_name, "Portal");
        assert_eq!(rows[0].1.status, "completed");
    }

    #[test]
    fn test_blank_rows_are_skipped_but_keep_file_numbering() {
        let data = csv_bytes(&[
            HEADER_JA,
            "A,P-1,,SE,2023-04-01,,,,進行中,",
            ",,,,,,,,,",
            "B,P-2,,SE,,,,,進行中,",
        ]);
        let rows = parse_rows(FileKind::Csv, &data, 100).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, 1);
        assert_eq!(rows[1].0, 3);
        assert_eq!(rows[1].1.project_name, "B");
    }

    #[test]
    fn test_missing_required_column() {
        let data = csv_bytes(&["プロジェクト名,役割", "A,SE"]);
        let err = parse_rows(FileKind::Csv, &data, 100).unwrap_err();
        match err {
            AppError::FileParse(message) => {
                assert!(message.contains("プロジェクトコード"));
                assert!(message.contains("開始日"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_non_utf8_csv_is_rejected() {
        // "プロジェクト名" in Shift_JIS
        let data = vec![0x83, 0x76, 0x83, 0x8D, 0x83, 0x57, 0x83, 0x46];
        assert!(matches!(
            parse_rows(FileKind::Csv, &data, 100),
            Err(AppError::FileParse(_))
        ));
    }

    #[test]
    fn test_header_only_file_is_rejected() {
        let data = csv_bytes(&[HEADER_JA]);
        assert!(matches!(
            parse_rows(FileKind::Csv, &data, 100),
            Err(AppError::FileParse(_))
        ));
        assert!(matches!(
            parse_rows(FileKind::Csv, b"", 100),
            Err(AppError::FileParse(_))
        ));
    }

    #[test]
    fn test_row_limit() {
        let data = csv_bytes(&[
            HEADER_JA,
            "A,P-1,,SE,2023-04-01,,,,進行中,",
            "B,P-2,,SE,2023-04-01,,,,進行中,",
            "C,P-3,,SE,2023-04-01,,,,進行中,",
        ]);
        assert_eq!(parse_rows(FileKind::Csv, &data, 3).unwrap().len(), 3);
        assert!(matches!(
            parse_rows(FileKind::Csv, &data, 2),
            Err(AppError::FileParse(_))
        ));
    }

    #[test]
    fn test_xlsx_first_sheet_with_date_cells() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, (_, label)) in WORK_RECORD_COLUMNS.iter().enumerate() {
            sheet.write_string(0, col as u16, *label).unwrap();
        }
        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        let start = ExcelDateTime::from_ymd(2023, 4, 1).unwrap();
        sheet.write_string(1, 0, "基幹システム刷新").unwrap();
        sheet.write_string(1, 1, "PRJ-001").unwrap();
        sheet.write_string(1, 3, "PL").unwrap();
        sheet
            .write_datetime_with_format(1, 4, &start, &date_format)
            .unwrap();
        sheet.write_number(1, 6, 80).unwrap();
        sheet.write_number(1, 7, 6).unwrap();
        sheet.write_string(1, 8, "進行中").unwrap();
        workbook.add_worksheet().write_string(0, 0, "ignored").unwrap();
        let data = workbook.save_to_buffer().unwrap();

        let rows = parse_rows(FileKind::Xlsx, &data, 100).unwrap();
        assert_eq!(rows.len(), 1);
        let (row_number, row) = &rows[0];
        assert_eq!(*row_number, 1);
        assert_eq!(row.project_code, "PRJ-001");
        assert_eq!(row.start_date, "2023-04-01");
        assert_eq!(row.participation_rate, "80");
        assert_eq!(row.team_size, "6");
        assert_eq!(row.client_name, "");
    }

    #[test]
    fn test_corrupt_workbook_is_rejected() {
        assert!(matches!(
            parse_rows(FileKind::Xlsx, b"not a zip archive", 100),
            Err(AppError::FileParse(_))
        ));
        assert!(matches!(
            parse_rows(FileKind::Xls, b"not an ole file", 100),
            Err(AppError::FileParse(_))
        ));
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Float(6.0)), "6");
        assert_eq!(cell_text(&Data::Float(62.5)), "62.5");
        assert_eq!(cell_text(&Data::Int(3)), "3");
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(
            cell_text(&Data::DateTimeIso("2024-03-31T00:00:00".to_string())),
            "2024-03-31"
        );
    }
}
