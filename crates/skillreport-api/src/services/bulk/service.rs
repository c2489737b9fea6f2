//! Bulk work-record upload service
//!
//! Two requests make up one upload: `validate` parses and checks every row of a
//! file and parks the outcome in the [`ValidationStore`]; `execute` consumes that
//! run and persists its rows one by one.

use std::sync::Arc;

use chrono::Utc;
use skillreport_core::models::{
    BulkValidateResponse, ExecutionResult, ExecutionStatus, RowOutcome, RowStatus, ValidationRun,
    ValidationSummary,
};
use skillreport_core::validation::{parse_record, summarize};
use skillreport_core::{AppError, BulkConfig, ErrorMetadata, WorkRecordStore};
use tracing::Instrument;
use uuid::Uuid;

use super::parser::parse_rows;
use super::store::{validation_not_found, ValidationStore};
use crate::auth::AuthContext;
use crate::utils::{validate_file_size, UploadedFile};

pub struct BulkUploadService {
    store: Arc<ValidationStore>,
    records: Arc<dyn WorkRecordStore>,
    config: BulkConfig,
}

impl BulkUploadService {
    pub fn new(
        store: Arc<ValidationStore>,
        records: Arc<dyn WorkRecordStore>,
        config: BulkConfig,
    ) -> Self {
        Self {
            store,
            records,
            config,
        }
    }

    pub fn config(&self) -> &BulkConfig {
        &self.config
    }

    pub async fn pending_validations(&self) -> usize {
        self.store.len().await
    }

    /// Validate an uploaded file: check type → check size → parse → validate rows → store run
    #[tracing::instrument(skip(self, caller, file), fields(user_id = %caller.user_id, filename = %file.filename, size = file.data.len()))]
    pub async fn validate(
        &self,
        caller: &AuthContext,
        file: UploadedFile,
    ) -> Result<BulkValidateResponse, AppError> {
        let kind = file.kind()?;
        validate_file_size(file.data.len(), self.config.max_file_size_bytes)?;

        let rows = parse_rows(kind, &file.data, self.config.max_rows)?;
        let (items, summary) = summarize(&rows);

        let validation_id = Uuid::new_v4();
        self.store
            .insert(ValidationRun {
                validation_id,
                user_id: caller.user_id,
                employee_id: caller.employee_id,
                items: items.clone(),
                summary,
                created_at: Utc::now(),
            })
            .await;

        tracing::info!(
            validation_id = %validation_id,
            total = summary.total_count,
            errors = summary.error_count,
            "Bulk upload validated"
        );

        Ok(BulkValidateResponse {
            success: true,
            message: validation_message(&summary),
            validation_id: Some(validation_id),
            summary,
            validation_result: items,
        })
    }

    /// Persist the rows of a validated run.
    ///
    /// The run must belong to the caller and contain no ERROR rows. It is
    /// removed from the store before the first row is written, so a second
    /// call with the same id gets `VALIDATION_NOT_FOUND`.
    #[tracing::instrument(skip(self, caller), fields(user_id = %caller.user_id))]
    pub async fn execute(
        &self,
        caller: &AuthContext,
        validation_id: &str,
    ) -> Result<ExecutionResult, AppError> {
        let validation_id =
            Uuid::parse_str(validation_id.trim()).map_err(|_| validation_not_found())?;

        let run = self
            .store
            .take_if(&validation_id, |run| {
                if run.user_id != caller.user_id {
                    return Err(validation_not_found());
                }
                if run.summary.error_count > 0 {
                    return Err(AppError::ValidationHasErrors {
                        error_count: run.summary.error_count,
                    });
                }
                Ok(())
            })
            .await?;

        // Rows are written by a detached task: if the request is dropped (client
        // gone, request timeout) the consumed run is still persisted in full.
        let persist = tokio::spawn(
            persist_rows(self.records.clone(), run).instrument(tracing::Span::current()),
        );
        let result = persist
            .await
            .map_err(|e| AppError::Internal(format!("Bulk execution task failed: {}", e)))?;
        Ok(result)
    }
}

/// Persist every OK/WARNING row of a run; one row failing does not stop the rest
async fn persist_rows(records: Arc<dyn WorkRecordStore>, run: ValidationRun) -> ExecutionResult {
    let mut outcomes = Vec::with_capacity(run.items.len());
    for item in run.items.iter().filter(|item| item.status != RowStatus::Error) {
        let outcome = match parse_record(&item.data) {
            Err(errors) => RowOutcome {
                row: item.row,
                status: ExecutionStatus::Error,
                message: errors
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join(" / "),
            },
            Ok(record) => match records.create_work_record(run.employee_id, &record).await {
                Ok(created) => RowOutcome {
                    row: item.row,
                    status: ExecutionStatus::Success,
                    message: format!("「{}」を登録しました", created.project_name),
                },
                Err(err) => {
                    tracing::warn!(row = item.row, error = %err, "Failed to persist work record");
                    RowOutcome {
                        row: item.row,
                        status: ExecutionStatus::Error,
                        message: err.client_message(),
                    }
                }
            },
        };
        outcomes.push(outcome);
    }

    let result = ExecutionResult::from_outcomes(outcomes);
    tracing::info!(
        validation_id = %run.validation_id,
        success_count = result.success_count,
        error_count = result.error_count,
        "Bulk upload executed"
    );
    result
}

fn validation_message(summary: &ValidationSummary) -> String {
    if summary.error_count == 0 {
        format!(
            "{}件すべての検証が完了しました。登録を実行できます",
            summary.total_count
        )
    } else {
        format!(
            "{}件中{}件にエラーがあります。ファイルを修正して再度アップロードしてください",
            summary.total_count, summary.error_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use skillreport_core::models::{EmployeeRole, NewWorkRecord, WorkRecord};
    use std::sync::Mutex;
    use std::time::Duration;

    const HEADER: &str = "プロジェクト名,プロジェクトコード,役割,開始日,終了日,ステータス,使用技術";

    /// Records every insert; fails for the listed project codes
    #[derive(Default)]
    struct FakeStore {
        fail_codes: Vec<String>,
        insert_delay: Option<Duration>,
        inserted: Mutex<Vec<NewWorkRecord>>,
    }

    #[async_trait]
    impl WorkRecordStore for FakeStore {
        async fn create_work_record(
            &self,
            employee_id: Uuid,
            record: &NewWorkRecord,
        ) -> Result<WorkRecord, AppError> {
            if let Some(delay) = self.insert_delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail_codes.contains(&record.project_code) {
                return Err(AppError::Internal("insert failed".to_string()));
            }
            self.inserted.lock().unwrap().push(record.clone());
            let now = Utc::now();
            Ok(WorkRecord {
                id: Uuid::new_v4(),
                employee_id,
                project_name: record.project_name.clone(),
                project_code: record.project_code.clone(),
                client_name: record.client_name.clone(),
                role_title: record.role_title.clone(),
                start_date: record.start_date,
                end_date: record.end_date,
                participation_rate: record.participation_rate,
                team_size: record.team_size,
                status: record.status,
                technologies: record.technologies.clone(),
                responsibilities: record.responsibilities.clone(),
                achievements: record.achievements.clone(),
                description: record.description.clone(),
                created_at: now,
                updated_at: now,
            })
        }
    }

    fn caller() -> AuthContext {
        AuthContext {
            user_id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            role: EmployeeRole::Member,
        }
    }

    fn service(records: Arc<FakeStore>) -> BulkUploadService {
        BulkUploadService::new(
            Arc::new(ValidationStore::new(Duration::from_secs(60))),
            records,
            BulkConfig::default(),
        )
    }

    fn csv_file(rows: &[&str]) -> UploadedFile {
        let mut lines = vec![HEADER];
        lines.extend_from_slice(rows);
        UploadedFile {
            data: lines.join("\n").into_bytes(),
            filename: "records.csv".to_string(),
            content_type: "text/csv".to_string(),
        }
    }

    fn row(code: &str) -> String {
        format!("案件{code},{code},SE,2023-04-01,2023-09-30,完了,Rust")
    }

    #[tokio::test]
    async fn test_validate_reports_row_two_missing_start_date() {
        let service = service(Arc::new(FakeStore::default()));
        let rows = [row("P-1"), "案件P-2,P-2,SE,,,進行中,Rust".to_string(), row("P-3")];
        let rows: Vec<&str> = rows.iter().map(String::as_str).collect();

        let response = service.validate(&caller(), csv_file(&rows)).await.unwrap();

        assert!(response.success);
        assert!(response.validation_id.is_some());
        assert_eq!(response.validation_result.len(), 3);
        assert_eq!(response.summary.total_count, 3);
        assert_eq!(response.summary.success_count, 2);
        assert_eq!(response.summary.error_count, 1);
        assert_eq!(response.summary.success_rate, 66.7);
        let second = &response.validation_result[1];
        assert_eq!(second.row, 2);
        assert_eq!(second.status, RowStatus::Error);
        assert_eq!(second.errors.len(), 1);
        assert_eq!(second.errors[0].field, "start_date");
        assert_eq!(second.errors[0].message, "開始日は必須です");
    }

    #[tokio::test]
    async fn test_validate_numbers_rows_by_file_position() {
        let service = service(Arc::new(FakeStore::default()));
        let rows = [row("P-1"), ",,,,,,".to_string(), "案件P-2,P-2,SE,,,進行中,Rust".to_string()];
        let rows: Vec<&str> = rows.iter().map(String::as_str).collect();

        let response = service.validate(&caller(), csv_file(&rows)).await.unwrap();

        assert_eq!(response.summary.total_count, 2);
        assert_eq!(response.summary.error_count, 1);
        let failed = &response.validation_result[1];
        assert_eq!(failed.row, 3);
        assert_eq!(failed.status, RowStatus::Error);
        assert_eq!(failed.errors[0].field, "start_date");
    }

    #[tokio::test]
    async fn test_validate_rejects_wrong_type_and_size() {
        let service = service(Arc::new(FakeStore::default()));
        let mut file = csv_file(&[&row("P-1")]);
        file.filename = "records.txt".to_string();
        assert!(matches!(
            service.validate(&caller(), file).await,
            Err(AppError::InvalidFileType(_))
        ));

        let mut service = service;
        service.config.max_file_size_bytes = 16;
        assert!(matches!(
            service.validate(&caller(), csv_file(&[&row("P-1")])).await,
            Err(AppError::PayloadTooLarge(_))
        ));
    }

    #[tokio::test]
    async fn test_execute_persists_all_rows_once() {
        let records = Arc::new(FakeStore::default());
        let service = service(records.clone());
        let user = caller();
        let rows = [row("P-1"), row("P-2")];
        let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
        let validated = service.validate(&user, csv_file(&rows)).await.unwrap();
        let id = validated.validation_id.unwrap().to_string();

        let result = service.execute(&user, &id).await.unwrap();
        assert!(result.success);
        assert_eq!(result.success_count, 2);
        assert_eq!(result.error_count, 0);
        assert_eq!(result.message, "2件の業務経歴を登録しました");

        assert!(matches!(
            service.execute(&user, &id).await,
            Err(AppError::ValidationNotFound(_))
        ));
        assert_eq!(records.inserted.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_execute_continues_after_row_failure() {
        let records = Arc::new(FakeStore {
            fail_codes: vec!["P-3".to_string()],
            ..Default::default()
        });
        let service = service(records.clone());
        let user = caller();
        let rows = [row("P-1"), row("P-2"), row("P-3"), row("P-4")];
        let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
        let validated = service.validate(&user, csv_file(&rows)).await.unwrap();

        let result = service
            .execute(&user, &validated.validation_id.unwrap().to_string())
            .await
            .unwrap();

        assert!(!result.success);
        assert_eq!(result.success_count, 3);
        assert_eq!(result.error_count, 1);
        let failed: Vec<&RowOutcome> = result
            .result_details
            .iter()
            .filter(|o| o.status == ExecutionStatus::Error)
            .collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].row, 3);
        assert_eq!(records.inserted.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_execute_finishes_batch_when_request_is_dropped() {
        let records = Arc::new(FakeStore {
            insert_delay: Some(Duration::from_millis(20)),
            ..Default::default()
        });
        let service = service(records.clone());
        let user = caller();
        let rows = [row("P-1"), row("P-2"), row("P-3")];
        let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
        let validated = service.validate(&user, csv_file(&rows)).await.unwrap();
        let id = validated.validation_id.unwrap().to_string();

        let timed_out =
            tokio::time::timeout(Duration::from_millis(5), service.execute(&user, &id)).await;
        assert!(timed_out.is_err());

        for _ in 0..100 {
            if records.inserted.lock().unwrap().len() == 3 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(records.inserted.lock().unwrap().len(), 3);
        assert!(matches!(
            service.execute(&user, &id).await,
            Err(AppError::ValidationNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_execute_refuses_runs_with_errors() {
        let records = Arc::new(FakeStore::default());
        let service = service(records.clone());
        let user = caller();
        let rows = [row("P-1"), "案件P-2,P-2,SE,,,進行中,Rust".to_string()];
        let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
        let validated = service.validate(&user, csv_file(&rows)).await.unwrap();
        let id = validated.validation_id.unwrap();

        assert!(matches!(
            service.execute(&user, &id.to_string()).await,
            Err(AppError::ValidationHasErrors { error_count: 1 })
        ));
        assert!(service.store.get(&id).await.is_some());
        assert!(records.inserted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_execute_unknown_or_foreign_id() {
        let service = service(Arc::new(FakeStore::default()));
        let owner = caller();
        let validated = service
            .validate(&owner, csv_file(&[&row("P-1")]))
            .await
            .unwrap();
        let id = validated.validation_id.unwrap().to_string();

        assert!(matches!(
            service.execute(&caller(), &id).await,
            Err(AppError::ValidationNotFound(_))
        ));
        assert!(matches!(
            service.execute(&owner, "not-a-uuid").await,
            Err(AppError::ValidationNotFound(_))
        ));
        assert!(matches!(
            service.execute(&owner, &Uuid::new_v4().to_string()).await,
            Err(AppError::ValidationNotFound(_))
        ));
        // the owner can still execute after a foreign attempt
        assert!(service.execute(&owner, &id).await.is_ok());
    }
}
