//! In-memory store of completed vision analyses.
//!
//! Each image upload produces a session the dashboard can re-fetch while the
//! user inspects the annotated result, then discard. Sessions never touch
//! the database; restarting the server clears them.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use farmtech_inference::{AnalysisOutcome, ClassificationReport, DetectionReport};

/// Result payload of one analysis, detector-shaped or classifier-shaped.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AnalysisRecord {
    Detection(AnalysisOutcome<DetectionReport>),
    Classification(AnalysisOutcome<ClassificationReport>),
}

/// One stored analysis, addressable by id until removed.
#[derive(Debug, Clone, Serialize)]
pub struct VisionSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub analysis: AnalysisRecord,
}

/// Shared handle to the session map. Cloning is cheap.
#[derive(Clone, Default)]
pub struct VisionSessionStore {
    inner: Arc<RwLock<HashMap<Uuid, VisionSession>>>,
}

impl VisionSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an analysis under a fresh id and return the full session.
    pub async fn insert(&self, analysis: AnalysisRecord) -> VisionSession {
        let session = VisionSession {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            analysis,
        };
        self.inner
            .write()
            .await
            .insert(session.id, session.clone());
        session
    }

    pub async fn get(&self, id: Uuid) -> Option<VisionSession> {
        self.inner.read().await.get(&id).cloned()
    }

    /// Remove a session, returning it if it existed.
    pub async fn remove(&self, id: Uuid) -> Option<VisionSession> {
        self.inner.write().await.remove(&id)
    }

    /// Number of sessions currently held.
    pub async fn count(&self) -> usize {
        self.inner.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use farmtech_inference::DetectionReport;

    fn sample_record() -> AnalysisRecord {
        AnalysisRecord::Detection(AnalysisOutcome::Completed {
            result: DetectionReport {
                model: "detector-optimized",
                detections: vec![],
                total: 0,
            },
        })
    }

    #[tokio::test]
    async fn insert_get_remove_round_trip() {
        let store = VisionSessionStore::new();
        let session = store.insert(sample_record()).await;

        assert_eq!(store.count().await, 1);
        assert!(store.get(session.id).await.is_some());

        let removed = store.remove(session.id).await;
        assert_eq!(removed.map(|s| s.id), Some(session.id));
        assert_eq!(store.count().await, 0);
        assert!(store.get(session.id).await.is_none());
    }

    #[tokio::test]
    async fn unknown_id_is_none() {
        let store = VisionSessionStore::new();
        assert!(store.get(Uuid::new_v4()).await.is_none());
        assert!(store.remove(Uuid::new_v4()).await.is_none());
    }
}
