//! Upload wizard state machine: upload → validation → execution
//!
//! The wizard holds the outcome of the last validate/execute call made through
//! the HTTP API. Failed calls never advance it; they leave the current step in
//! place with `last_error` set for inline display.

use skillreport_core::models::{
    BulkExecuteRequest, BulkValidateResponse, ExecutionResult, RowStatus, ValidationResultItem,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Upload,
    Validation,
    Execution,
}

#[derive(Debug, Clone)]
pub enum WizardState {
    Upload,
    Validation {
        result: BulkValidateResponse,
        errors_only: bool,
    },
    Execution {
        result: ExecutionResult,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("{action} is not available in the {step:?} step")]
    InvalidTransition {
        step: WizardStep,
        action: &'static str,
    },
    #[error("execution requires a validation without errors")]
    ExecutionBlocked,
}

#[derive(Debug, Clone)]
pub struct UploadWizard {
    state: WizardState,
    last_error: Option<String>,
}

impl Default for UploadWizard {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadWizard {
    pub fn new() -> Self {
        Self {
            state: WizardState::Upload,
            last_error: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        match self.state {
            WizardState::Upload => WizardStep::Upload,
            WizardState::Validation { .. } => WizardStep::Validation,
            WizardState::Execution { .. } => WizardStep::Execution,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn expect_step(&self, step: WizardStep, action: &'static str) -> Result<(), WizardError> {
        if self.step() == step {
            Ok(())
        } else {
            Err(WizardError::InvalidTransition {
                step: self.step(),
                action,
            })
        }
    }

    /// Record the outcome of `POST /api/work/bulk/validate`
    pub fn on_validated(
        &mut self,
        outcome: Result<BulkValidateResponse, String>,
    ) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Upload, "on_validated")?;
        match outcome {
            Ok(result) if result.success => {
                self.state = WizardState::Validation {
                    result,
                    errors_only: false,
                };
                self.last_error = None;
            }
            Ok(result) => self.last_error = Some(result.message),
            Err(message) => self.last_error = Some(message),
        }
        Ok(())
    }

    pub fn toggle_errors_only(&mut self) -> Result<bool, WizardError> {
        let step = self.step();
        match &mut self.state {
            WizardState::Validation { errors_only, .. } => {
                *errors_only = !*errors_only;
                Ok(*errors_only)
            }
            _ => Err(WizardError::InvalidTransition {
                step,
                action: "toggle_errors_only",
            }),
        }
    }

    /// Rows to render: all of them, or only ERROR rows when the filter is on
    pub fn visible_items(&self) -> Vec<&ValidationResultItem> {
        match &self.state {
            WizardState::Validation {
                result,
                errors_only,
            } => result
                .validation_result
                .iter()
                .filter(|item| !*errors_only || item.status == RowStatus::Error)
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn back_to_upload(&mut self) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Validation, "back_to_upload")?;
        self.reset();
        Ok(())
    }

    /// The execute button is enabled only for an error-free validation
    pub fn can_execute(&self) -> bool {
        match &self.state {
            WizardState::Validation { result, .. } => {
                result.summary.error_count == 0 && result.validation_id.is_some()
            }
            _ => false,
        }
    }

    /// Body for `POST /api/work/bulk/execute`
    pub fn execute_request(&self) -> Result<BulkExecuteRequest, WizardError> {
        self.expect_step(WizardStep::Validation, "execute_request")?;
        match &self.state {
            WizardState::Validation { result, .. } if self.can_execute() => {
                Ok(BulkExecuteRequest {
                    validation_id: result
                        .validation_id
                        .map(|id| id.to_string())
                        .unwrap_or_default(),
                })
            }
            _ => Err(WizardError::ExecutionBlocked),
        }
    }

    /// Record the outcome of `POST /api/work/bulk/execute`.
    ///
    /// Only an executable validation may advance. A completed call advances even
    /// when some rows failed; their outcomes are part of the result shown in the
    /// execution step.
    pub fn on_executed(
        &mut self,
        outcome: Result<ExecutionResult, String>,
    ) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Validation, "on_executed")?;
        if !self.can_execute() {
            return Err(WizardError::ExecutionBlocked);
        }
        match outcome {
            Ok(result) => {
                self.state = WizardState::Execution { result };
                self.last_error = None;
            }
            Err(message) => self.last_error = Some(message),
        }
        Ok(())
    }

    pub fn upload_another(&mut self) -> Result<(), WizardError> {
        self.expect_step(WizardStep::Execution, "upload_another")?;
        self.reset();
        Ok(())
    }

    pub fn reset(&mut self) {
        self.state = WizardState::Upload;
        self.last_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillreport_core::models::{
        ExecutionStatus, FieldError, RowOutcome, ValidationSummary, WorkRecordRow,
    };
    use uuid::Uuid;

    fn item(row: usize, status: RowStatus) -> ValidationResultItem {
        ValidationResultItem {
            row,
            status,
            errors: if status == RowStatus::Error {
                vec![FieldError::new("start_date", "開始日は必須です")]
            } else {
                Vec::new()
            },
            data: WorkRecordRow::default(),
        }
    }

    fn validated(statuses: &[RowStatus]) -> BulkValidateResponse {
        let items: Vec<ValidationResultItem> = statuses
            .iter()
            .enumerate()
            .map(|(idx, status)| item(idx + 1, *status))
            .collect();
        BulkValidateResponse {
            success: true,
            message: "ok".to_string(),
            validation_id: Some(Uuid::new_v4()),
            summary: ValidationSummary::from_items(&items),
            validation_result: items,
        }
    }

    fn executed() -> ExecutionResult {
        ExecutionResult::from_outcomes(vec![RowOutcome {
            row: 1,
            status: ExecutionStatus::Success,
            message: "ok".to_string(),
        }])
    }

    #[test]
    fn test_happy_path() {
        let mut wizard = UploadWizard::new();
        assert_eq!(wizard.step(), WizardStep::Upload);

        wizard
            .on_validated(Ok(validated(&[RowStatus::Ok, RowStatus::Warning])))
            .unwrap();
        assert_eq!(wizard.step(), WizardStep::Validation);
        assert!(wizard.can_execute());
        assert!(wizard.execute_request().is_ok());

        wizard.on_executed(Ok(executed())).unwrap();
        assert_eq!(wizard.step(), WizardStep::Execution);

        wizard.upload_another().unwrap();
        assert_eq!(wizard.step(), WizardStep::Upload);
    }

    #[test]
    fn test_failed_validation_stays_on_upload() {
        let mut wizard = UploadWizard::new();
        wizard
            .on_validated(Err("ファイル形式が正しくありません".to_string()))
            .unwrap();
        assert_eq!(wizard.step(), WizardStep::Upload);
        assert_eq!(wizard.last_error(), Some("ファイル形式が正しくありません"));
    }

    #[test]
    fn test_errors_block_execution_and_filter_rows() {
        let mut wizard = UploadWizard::new();
        wizard
            .on_validated(Ok(validated(&[
                RowStatus::Ok,
                RowStatus::Error,
                RowStatus::Ok,
            ])))
            .unwrap();

        assert!(!wizard.can_execute());
        assert!(matches!(
            wizard.execute_request(),
            Err(WizardError::ExecutionBlocked)
        ));
        assert_eq!(wizard.visible_items().len(), 3);

        assert!(wizard.toggle_errors_only().unwrap());
        let visible = wizard.visible_items();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].row, 2);

        wizard.back_to_upload().unwrap();
        assert_eq!(wizard.step(), WizardStep::Upload);
    }

    #[test]
    fn test_execution_result_rejected_for_validation_with_errors() {
        let mut wizard = UploadWizard::new();
        wizard
            .on_validated(Ok(validated(&[RowStatus::Ok, RowStatus::Error])))
            .unwrap();

        assert_eq!(
            wizard.on_executed(Ok(executed())),
            Err(WizardError::ExecutionBlocked)
        );
        assert_eq!(wizard.step(), WizardStep::Validation);
        assert!(wizard.last_error().is_none());
    }

    #[test]
    fn test_failed_execution_stays_on_validation() {
        let mut wizard = UploadWizard::new();
        wizard.on_validated(Ok(validated(&[RowStatus::Ok]))).unwrap();
        wizard
            .on_executed(Err("検証結果が見つかりません".to_string()))
            .unwrap();
        assert_eq!(wizard.step(), WizardStep::Validation);
        assert_eq!(wizard.last_error(), Some("検証結果が見つかりません"));
    }

    #[test]
    fn test_out_of_order_actions_are_rejected() {
        let mut wizard = UploadWizard::new();
        assert!(matches!(
            wizard.on_executed(Ok(executed())),
            Err(WizardError::InvalidTransition {
                step: WizardStep::Upload,
                ..
            })
        ));
        assert!(wizard.toggle_errors_only().is_err());
        assert!(wizard.upload_another().is_err());
        assert!(!wizard.can_execute());
    }
}
