use async_trait::async_trait;
use qdrant_client::qdrant::{
    point_id::PointIdOptions, value::Kind, CreateCollectionBuilder, Distance, PointStruct,
    QueryPointsBuilder, UpsertPointsBuilder, Value, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use std::time::Duration;
use workmatch_common::{EngineError, Result, StorageConfig};

/// Logical collections held by the vector store. `Tasks` holds historical
/// task vectors and is not consulted by the employee match path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Employees,
    Tasks,
}

impl Collection {
    pub fn collection_name(&self) -> &'static str {
        match self {
            Collection::Employees => "employees",
            Collection::Tasks => "tasks",
        }
    }

    pub fn all() -> [Collection; 2] {
        [Collection::Employees, Collection::Tasks]
    }
}

/// One `{id, vector, payload}` record bound for the store.
#[derive(Debug, Clone)]
pub struct VectorRecord {
    pub id: u64,
    pub vector: Vec<f32>,
    pub payload: serde_json::Value,
}

/// One nearest-neighbor hit. Result lists come back ordered by score
/// descending in the store's native tie order.
#[derive(Debug, Clone)]
pub struct ScoredRecord {
    pub id: u64,
    pub score: f32,
    pub payload: serde_json::Value,
}

/// The vector-store contract the matcher depends on. Object-safe so tests
/// can inject a double.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Write records, replacing any prior vector with the same id
    /// (idempotent by id). Concurrent writes for the same id are
    /// last-write-wins at the store's discretion.
    async fn upsert(&self, collection: Collection, records: Vec<VectorRecord>) -> Result<()>;

    /// Return the `limit` nearest records under the collection's metric,
    /// ordered descending by score.
    async fn query(
        &self,
        collection: Collection,
        vector: Vec<f32>,
        limit: usize,
    ) -> Result<Vec<ScoredRecord>>;
}

/// Qdrant-backed similarity index.
pub struct QdrantIndex {
    client: Qdrant,
}

impl QdrantIndex {
    /// Connect using the configured URL, API key and request timeout.
    /// Invalid connection configuration is fatal here, not on first call.
    pub fn new(config: &StorageConfig) -> Result<Self> {
        let mut builder = Qdrant::from_url(&config.qdrant_url)
            .timeout(Duration::from_secs(config.request_timeout_secs));
        if let Some(api_key) = &config.qdrant_api_key {
            builder = builder.api_key(api_key.clone());
        }
        let client = builder.build().map_err(|e| {
            EngineError::Configuration(format!(
                "cannot build qdrant client for {}: {}",
                config.qdrant_url, e
            ))
        })?;
        Ok(Self { client })
    }

    /// Create any missing collection with the given vector dimension under
    /// cosine similarity.
    pub async fn ensure_collections(&self, dimension: usize) -> Result<()> {
        for collection in Collection::all() {
            let name = collection.collection_name();
            let exists = self
                .client
                .collection_exists(name)
                .await
                .map_err(|e| EngineError::Service(format!("collection check failed: {}", e)))?;
            if !exists {
                self.create_collection(name, dimension).await?;
                tracing::info!(collection = name, dimension, "created collection");
            }
        }
        Ok(())
    }

    /// Drop and recreate both collections.
    pub async fn recreate_collections(&self, dimension: usize) -> Result<()> {
        for collection in Collection::all() {
            let name = collection.collection_name();
            // Deleting a missing collection is not an error worth surfacing.
            if let Err(e) = self.client.delete_collection(name).await {
                tracing::debug!(collection = name, error = %e, "delete skipped");
            }
            self.create_collection(name, dimension).await?;
            tracing::info!(collection = name, dimension, "recreated collection");
        }
        Ok(())
    }

    async fn create_collection(&self, name: &str, dimension: usize) -> Result<()> {
        self.client
            .create_collection(
                CreateCollectionBuilder::new(name)
                    .vectors_config(VectorParamsBuilder::new(dimension as u64, Distance::Cosine)),
            )
            .await
            .map_err(|e| {
                EngineError::Service(format!("cannot create collection {}: {}", name, e))
            })?;
        Ok(())
    }
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn upsert(&self, collection: Collection, records: Vec<VectorRecord>) -> Result<()> {
        let name = collection.collection_name();
        let mut points = Vec::with_capacity(records.len());
        for record in records {
            let payload = Payload::try_from(record.payload).map_err(|e| {
                EngineError::Validation(format!("payload for id {} is not an object: {}", record.id, e))
            })?;
            points.push(PointStruct::new(record.id, record.vector, payload));
        }

        let count = points.len();
        self.client
            .upsert_points(UpsertPointsBuilder::new(name, points))
            .await
            .map_err(|e| EngineError::Service(format!("upsert into {} failed: {}", name, e)))?;
        tracing::debug!(collection = name, count, "upserted points");
        Ok(())
    }

    async fn query(
        &self,
        collection: Collection,
        vector: Vec<f32>,
        limit: usize,
    ) -> Result<Vec<ScoredRecord>> {
        let name = collection.collection_name();
        let response = self
            .client
            .query(
                QueryPointsBuilder::new(name)
                    .query(vector)
                    .limit(limit as u64)
                    .with_payload(true),
            )
            .await
            .map_err(|e| EngineError::Service(format!("query against {} failed: {}", name, e)))?;

        let mut records = Vec::with_capacity(response.result.len());
        for point in response.result {
            let id = match point.id.and_then(|id| id.point_id_options) {
                Some(PointIdOptions::Num(n)) => n,
                _ => continue,
            };
            let payload = serde_json::Value::Object(
                point
                    .payload
                    .into_iter()
                    .map(|(key, value)| (key, value_to_json(value)))
                    .collect(),
            );
            records.push(ScoredRecord {
                id,
                score: point.score,
                payload,
            });
        }
        Ok(records)
    }
}

fn value_to_json(value: Value) -> serde_json::Value {
    match value.kind {
        None | Some(Kind::NullValue(_)) => serde_json::Value::Null,
        Some(Kind::BoolValue(b)) => serde_json::Value::Bool(b),
        Some(Kind::IntegerValue(i)) => serde_json::json!(i),
        Some(Kind::DoubleValue(d)) => serde_json::json!(d),
        Some(Kind::StringValue(s)) => serde_json::Value::String(s),
        Some(Kind::ListValue(list)) => {
            serde_json::Value::Array(list.values.into_iter().map(value_to_json).collect())
        }
        Some(Kind::StructValue(fields)) => serde_json::Value::Object(
            fields
                .fields
                .into_iter()
                .map(|(key, value)| (key, value_to_json(value)))
                .collect(),
        ),
    }
}
