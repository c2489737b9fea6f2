//! In-memory retention of validation runs between validate and execute

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use skillreport_core::models::ValidationRun;
use skillreport_core::AppError;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use uuid::Uuid;

struct StoredRun {
    run: ValidationRun,
    stored_at: Instant,
}

/// Validation runs keyed by `validation_id`, dropped after `ttl`.
///
/// Runs are single-use: [`ValidationStore::take_if`] removes a run under the
/// write lock, so two concurrent executions of one id cannot both obtain it.
pub struct ValidationStore {
    runs: RwLock<HashMap<Uuid, StoredRun>>,
    ttl: Duration,
}

impl ValidationStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            runs: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn is_live(&self, stored: &StoredRun) -> bool {
        stored.stored_at.elapsed() < self.ttl
    }

    pub async fn insert(&self, run: ValidationRun) {
        let mut runs = self.runs.write().await;
        runs.retain(|_, stored| self.is_live(stored));
        runs.insert(
            run.validation_id,
            StoredRun {
                run,
                stored_at: Instant::now(),
            },
        );
    }

    pub async fn get(&self, validation_id: &Uuid) -> Option<ValidationRun> {
        let runs = self.runs.read().await;
        runs.get(validation_id)
            .filter(|stored| self.is_live(stored))
            .map(|stored| stored.run.clone())
    }

    /// Remove and return a live run when `check` accepts it.
    ///
    /// A missing or expired run yields `VALIDATION_NOT_FOUND`. When `check`
    /// fails its error is returned and the run stays in the store.
    pub async fn take_if<F>(&self, validation_id: &Uuid, check: F) -> Result<ValidationRun, AppError>
    where
        F: FnOnce(&ValidationRun) -> Result<(), AppError>,
    {
        let mut runs = self.runs.write().await;
        let live = runs
            .get(validation_id)
            .filter(|stored| self.is_live(stored))
            .map(|stored| check(&stored.run));

        match live {
            None => {
                runs.remove(validation_id);
                Err(validation_not_found())
            }
            Some(Err(err)) => Err(err),
            Some(Ok(())) => runs
                .remove(validation_id)
                .map(|stored| stored.run)
                .ok_or_else(validation_not_found),
        }
    }

    pub async fn take(&self, validation_id: &Uuid) -> Result<ValidationRun, AppError> {
        self.take_if(validation_id, |_| Ok(())).await
    }

    /// Drop expired runs, returning how many were removed
    pub async fn sweep_expired(&self) -> usize {
        let mut runs = self.runs.write().await;
        let before = runs.len();
        runs.retain(|_, stored| self.is_live(stored));
        before - runs.len()
    }

    pub async fn len(&self) -> usize {
        self.runs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.runs.read().await.is_empty()
    }
}

pub(crate) fn validation_not_found() -> AppError {
    AppError::ValidationNotFound(
        "検証結果が見つかりません。もう一度ファイルをアップロードしてください".to_string(),
    )
}

/// Starts a background task that sweeps expired runs every `ttl / 2`.
pub fn spawn_sweeper(store: Arc<ValidationStore>) -> JoinHandle<()> {
    let period = (store.ttl() / 2).max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);

        loop {
            interval.tick().await;
            let removed = store.sweep_expired().await;
            if removed > 0 {
                tracing::debug!(removed = removed, "Swept expired validation runs");
            }
        }
    })
}
