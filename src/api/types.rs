//! Shared types for the API layer.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use crate::api::error::ApiError;
use crate::db::DataSource;

// ═══════════════════════════════════════════════════════════
// API context: shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes. Holds no mutable state: every
/// request loads its tables afresh through `source`.
#[derive(Clone)]
pub struct ApiContext {
    pub source: Arc<dyn DataSource>,
    pub query_timeout: Duration,
    /// Pinned "today" for reproducible responses; `None` uses the local date.
    pub today: Option<NaiveDate>,
}

impl ApiContext {
    pub fn new(source: Arc<dyn DataSource>, query_timeout: Duration) -> Self {
        Self {
            source,
            query_timeout,
            today: None,
        }
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    /// Run a blocking pipeline job off the async runtime, bounded by the
    /// configured query timeout.
    pub async fn run_blocking<T, F>(&self, job: F) -> Result<T, ApiError>
    where
        F: FnOnce(&dyn DataSource, NaiveDate) -> T + Send + 'static,
        T: Send + 'static,
    {
        let source = Arc::clone(&self.source);
        let today = self.today();
        let task = tokio::task::spawn_blocking(move || job(source.as_ref(), today));

        match tokio::time::timeout(self.query_timeout, task).await {
            Ok(joined) => Ok(joined?),
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.query_timeout.as_secs(),
                    source = %self.source.describe(),
                    "Pipeline exceeded query timeout"
                );
                Err(ApiError::Timeout(self.query_timeout.as_secs()))
            }
        }
    }
}

impl std::fmt::Debug for ApiContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiContext")
            .field("source", &self.source.describe())
            .field("query_timeout", &self.query_timeout)
            .field("today", &self.today)
            .finish()
    }
}
