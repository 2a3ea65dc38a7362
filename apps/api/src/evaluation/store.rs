//! In-memory evaluation store.
//!
//! Keeps the inputs of recent evaluations so the improvement step can reuse
//! them. Bounded: inserting past capacity evicts the oldest evaluation.
//! Nothing survives a restart.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::similarity::{SimilarityScore, Verdict};

#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub id: Uuid,
    pub resume_text: String,
    pub job_description: Option<String>,
    pub similarity: Option<SimilarityScore>,
    pub verdict: Verdict,
    pub report_markdown: String,
    pub improved_resume: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct EvaluationStore {
    inner: Arc<RwLock<HashMap<Uuid, Evaluation>>>,
    capacity: usize,
}

impl EvaluationStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    pub async fn insert(&self, evaluation: Evaluation) {
        let mut map = self.inner.write().await;

        while map.len() >= self.capacity && !map.contains_key(&evaluation.id) {
            let oldest = map
                .values()
                .min_by_key(|e| e.created_at)
                .map(|e| e.id);
            match oldest {
                Some(id) => {
                    map.remove(&id);
                    tracing::debug!("Evicted evaluation {id} (store at capacity {})", self.capacity);
                }
                None => break,
            }
        }

        map.insert(evaluation.id, evaluation);
    }

    pub async fn get(&self, id: Uuid) -> Option<Evaluation> {
        self.inner.read().await.get(&id).cloned()
    }

    /// Attaches an improved resume. Returns false if the evaluation is gone.
    pub async fn set_improved_resume(&self, id: Uuid, improved: String) -> bool {
        match self.inner.write().await.get_mut(&id) {
            Some(evaluation) => {
                evaluation.improved_resume = Some(improved);
                true
            }
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}
