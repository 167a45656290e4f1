use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use workmatch_common::{EmbeddingConfig, EngineError, Result};

/// Encodes text into a fixed-dimension vector.
///
/// Implementations must be pure functions of text and model version: the same
/// text always yields the same vector. Test fixtures rely on this.
pub trait SkillEmbedder: Send + Sync {
    fn encode(&self, text: &str) -> Result<Vec<f32>>;

    fn dimension(&self) -> usize;
}

/// Dense embedder backed by a local fastembed model.
pub struct FastEmbedder {
    model: TextEmbedding,
    dimension: usize,
}

impl FastEmbedder {
    /// Load the configured model. Unknown model names are a configuration
    /// error, surfaced at startup rather than on first encode.
    pub fn new(config: &EmbeddingConfig) -> Result<Self> {
        let model_name = match config.model.as_str() {
            "all-minilm-l6-v2" => EmbeddingModel::AllMiniLML6V2,
            "bge-small-en-v1.5" => EmbeddingModel::BGESmallENV15,
            other => {
                return Err(EngineError::Configuration(format!(
                    "unknown embedding model '{}'",
                    other
                )))
            }
        };

        tracing::debug!(model = %config.model, "initializing fastembed model");
        let model = TextEmbedding::try_new(
            InitOptions::new(model_name).with_show_download_progress(false),
        )
        .map_err(|e| {
            EngineError::Configuration(format!("cannot initialize embedding model: {}", e))
        })?;

        Ok(Self {
            model,
            dimension: config.dimension,
        })
    }
}

impl SkillEmbedder for FastEmbedder {
    fn encode(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self
            .model
            .embed(vec![text], None)
            .map_err(|e| EngineError::Service(format!("embedding encode failed: {}", e)))?;
        embeddings
            .pop()
            .ok_or_else(|| EngineError::Service("embedding model returned no vector".to_string()))
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
