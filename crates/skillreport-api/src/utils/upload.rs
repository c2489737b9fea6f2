//! Multipart intake for the bulk work-record upload

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use skillreport_core::AppError;

/// Spreadsheet formats accepted by the bulk upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Xlsx,
    Xls,
}

impl FileKind {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Some(FileKind::Csv),
            "xlsx" => Some(FileKind::Xlsx),
            "xls" => Some(FileKind::Xls),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            FileKind::Csv => "csv",
            FileKind::Xlsx => "xlsx",
            FileKind::Xls => "xls",
        }
    }

    /// MIME types browsers send for this kind. Windows reports CSV as `application/vnd.ms-excel`.
    fn accepted_mime_types(&self) -> &'static [&'static str] {
        match self {
            FileKind::Csv => &[
                "text/csv",
                "application/csv",
                "text/plain",
                "application/vnd.ms-excel",
            ],
            FileKind::Xlsx => &[
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                "application/zip",
            ],
            FileKind::Xls => &["application/vnd.ms-excel"],
        }
    }
}

/// File received from the `file` multipart field
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub data: Vec<u8>,
    pub filename: String,
    pub content_type: String,
}

impl UploadedFile {
    /// Resolve the spreadsheet kind from the extension and declared MIME type
    pub fn kind(&self) -> Result<FileKind, AppError> {
        let extension = file_extension(&self.filename);
        let kind = FileKind::from_extension(extension).ok_or_else(|| {
            AppError::InvalidFileType(
                "CSV または Excel (.xlsx, .xls) ファイルを選択してください".to_string(),
            )
        })?;
        validate_content_type(&self.content_type, kind)?;
        Ok(kind)
    }
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("ファイルサイズが上限を超えています".to_string())
    } else {
        AppError::InvalidParameter(format!("マルチパートの読み込みに失敗しました: {}", err))
    }
}

/// Extract file data, filename, and content type from multipart form.
/// Only one field named "file" is accepted; multiple file fields are rejected.
pub async fn extract_multipart_file(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }
        if file.is_some() {
            return Err(AppError::InvalidParameter(
                "ファイルは1つだけ送信してください".to_string(),
            ));
        }
        let filename = field.file_name().unwrap_or("unknown").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field.bytes().await.map_err(multipart_error)?;

        file = Some(UploadedFile {
            data: data.to_vec(),
            filename,
            content_type,
        });
    }

    file.ok_or_else(|| AppError::InvalidParameter("ファイルが選択されていません".to_string()))
}

/// Validate file size
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "ファイルサイズは{}MB以下にしてください",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

/// Normalize MIME type by stripping parameters (e.g. "text/csv; charset=utf-8" -> "text/csv").
fn normalize_mime_type(content_type: &str) -> &str {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
}

/// The generic `application/octet-stream` is accepted for every kind.
pub fn validate_content_type(content_type: &str, kind: FileKind) -> Result<(), AppError> {
    let normalized = normalize_mime_type(content_type).to_lowercase();
    if normalized.is_empty()
        || normalized == "application/octet-stream"
        || kind.accepted_mime_types().contains(&normalized.as_str())
    {
        return Ok(());
    }
    Err(AppError::InvalidFileType(format!(
        "ファイル形式が拡張子 .{} と一致しません",
        kind.extension()
    )))
}

fn file_extension(filename: &str) -> &str {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
}
