//! History storage seam.
//!
//! Analysis summaries are recorded behind the `HistoryStore` trait so the
//! backend can be swapped without touching the handlers. The dispatch/decode
//! pipeline never reaches this module; only the HTTP layer records and
//! serves history.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;

/// One stored analysis run: a summary plus the full result payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub company: String,
    pub readiness_score: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub result: Value,
}

impl AnalysisRecord {
    /// Builds a record from a shape-checked analysis result.
    pub fn from_result(company: &str, result: &Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            company: company.to_string(),
            readiness_score: result.get("readinessScore").and_then(Value::as_f64),
            created_at: Utc::now(),
            result: result.clone(),
        }
    }
}

/// Filter for history listings. The default filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    pub company: Option<String>,
}

/// Storage interface for analysis history.
///
/// Carried in `AppState` as `Arc<dyn HistoryStore>`. Implement this to back
/// history with a durable store; `InMemoryHistoryStore` is the default.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<AnalysisRecord>, AppError>;
    async fn upsert(&self, record: AnalysisRecord) -> Result<(), AppError>;
    async fn list(&self, filter: HistoryFilter) -> Result<Vec<AnalysisRecord>, AppError>;
}

/// Process-local store. Records live as long as the service does.
#[derive(Default)]
pub struct InMemoryHistoryStore {
    records: RwLock<HashMap<Uuid, AnalysisRecord>>,
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn get(&self, id: Uuid) -> Result<Option<AnalysisRecord>, AppError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn upsert(&self, record: AnalysisRecord) -> Result<(), AppError> {
        self.records.write().await.insert(record.id, record);
        Ok(())
    }

    async fn list(&self, filter: HistoryFilter) -> Result<Vec<AnalysisRecord>, AppError> {
        let records = self.records.read().await;
        let mut matched: Vec<AnalysisRecord> = records
            .values()
            .filter(|record| match &filter.company {
                Some(company) => record.company.eq_ignore_ascii_case(company),
                None => true,
            })
            .cloned()
            .collect();
        // Newest first.
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record_for(company: &str, score: f64) -> AnalysisRecord {
        AnalysisRecord::from_result(
            company,
            &json!({"readinessScore": score, "roadmap": []}),
        )
    }

    #[tokio::test]
    async fn test_upsert_then_get_roundtrip() {
        let store = InMemoryHistoryStore::default();
        let record = record_for("Acme", 72.0);
        let id = record.id;

        store.upsert(record).await.unwrap();
        let fetched = store.get(id).await.unwrap().unwrap();
        assert_eq!(fetched.company, "Acme");
        assert_eq!(fetched.readiness_score, Some(72.0));
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_none() {
        let store = InMemoryHistoryStore::default();
        assert!(store.get(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing_record() {
        let store = InMemoryHistoryStore::default();
        let mut record = record_for("Acme", 50.0);
        let id = record.id;
        store.upsert(record.clone()).await.unwrap();

        record.readiness_score = Some(80.0);
        store.upsert(record).await.unwrap();

        let fetched = store.get(id).await.unwrap().unwrap();
        assert_eq!(fetched.readiness_score, Some(80.0));
        assert_eq!(store.list(HistoryFilter::default()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_filters_by_company_case_insensitive() {
        let store = InMemoryHistoryStore::default();
        store.upsert(record_for("Acme", 60.0)).await.unwrap();
        store.upsert(record_for("Globex", 70.0)).await.unwrap();

        let matched = store
            .list(HistoryFilter {
                company: Some("acme".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].company, "Acme");
    }

    #[tokio::test]
    async fn test_list_orders_newest_first() {
        let store = InMemoryHistoryStore::default();
        let older = AnalysisRecord {
            created_at: Utc::now() - chrono::Duration::hours(1),
            ..record_for("Acme", 10.0)
        };
        let newer = record_for("Acme", 90.0);
        store.upsert(older).await.unwrap();
        store.upsert(newer).await.unwrap();

        let listed = store.list(HistoryFilter::default()).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].readiness_score, Some(90.0));
    }

    #[test]
    fn test_record_extracts_readiness_score() {
        let record =
            AnalysisRecord::from_result("Acme", &json!({"readinessScore": 42, "roadmap": []}));
        assert_eq!(record.readiness_score, Some(42.0));

        let scoreless = AnalysisRecord::from_result("Acme", &json!({"roadmap": []}));
        assert_eq!(scoreless.readiness_score, None);
    }
}
