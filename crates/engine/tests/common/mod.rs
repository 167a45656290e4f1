//! Shared test doubles: a deterministic embedder, an in-memory cosine
//! index, and a scripted generative backend.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use workmatch_common::{EngineError, Result};
use workmatch_embedding::SkillEmbedder;
use workmatch_engine::GenerativeBackend;
use workmatch_storage::{Collection, ScoredRecord, VectorIndex, VectorRecord};

pub const FAKE_DIMENSION: usize = 8;

/// Pure function of the input text: folds bytes into a small vector.
pub struct FakeEmbedder;

impl SkillEmbedder for FakeEmbedder {
    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; FAKE_DIMENSION];
        for (i, byte) in text.bytes().enumerate() {
            vector[i % FAKE_DIMENSION] += byte as f32 / 255.0;
        }
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        FAKE_DIMENSION
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// In-memory index scoring by cosine similarity. Optionally fails upserts
/// from a given call count onward, to exercise chunked-write semantics.
#[derive(Default)]
pub struct FakeIndex {
    records: Mutex<HashMap<&'static str, Vec<VectorRecord>>>,
    pub upsert_calls: AtomicUsize,
    pub fail_upserts_from: Option<usize>,
}

impl FakeIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_from(call: usize) -> Self {
        Self {
            fail_upserts_from: Some(call),
            ..Self::default()
        }
    }

    pub fn stored_count(&self, collection: Collection) -> usize {
        self.records
            .lock()
            .unwrap()
            .get(collection.collection_name())
            .map(|r| r.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl VectorIndex for FakeIndex {
    async fn upsert(&self, collection: Collection, records: Vec<VectorRecord>) -> Result<()> {
        let call = self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(fail_from) = self.fail_upserts_from {
            if call >= fail_from {
                return Err(EngineError::Service("index write failed".to_string()));
            }
        }
        let mut store = self.records.lock().unwrap();
        let existing = store.entry(collection.collection_name()).or_default();
        for record in records {
            existing.retain(|r| r.id != record.id);
            existing.push(record);
        }
        Ok(())
    }

    async fn query(
        &self,
        collection: Collection,
        vector: Vec<f32>,
        limit: usize,
    ) -> Result<Vec<ScoredRecord>> {
        let store = self.records.lock().unwrap();
        let mut hits: Vec<ScoredRecord> = store
            .get(collection.collection_name())
            .map(|records| {
                records
                    .iter()
                    .map(|r| ScoredRecord {
                        id: r.id,
                        score: cosine(&vector, &r.vector),
                        payload: r.payload.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(limit);
        Ok(hits)
    }
}

/// Replays a queue of canned responses, counting calls.
pub struct ScriptedBackend {
    responses: Mutex<VecDeque<Result<String>>>,
    pub calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new(responses: Vec<Result<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerativeBackend for ScriptedBackend {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(EngineError::Service("no scripted response".to_string())))
    }
}

/// A well-formed complexity response body.
pub fn complexity_json() -> String {
    serde_json::json!({
        "complexity_score": 6,
        "recommended_skills": {"communication": 7, "problem_solving": 6},
        "challenges": ["peak hour volume", "escalation handling"],
        "duration_estimate": {
            "optimistic": 20,
            "likely": 35,
            "pessimistic": 60,
            "confidence": 0.8
        }
    })
    .to_string()
}
