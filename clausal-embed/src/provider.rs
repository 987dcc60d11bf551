//! Embedding provider implementations

use crate::error::{EmbedError, Result};
use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

/// Result of embedding generation
#[derive(Debug, Clone)]
pub struct EmbeddingResult {
    /// The generated embeddings, one per input text, in input order
    pub embeddings: Vec<Vec<f32>>,
    /// The dimension of each embedding vector
    pub dimension: usize,
}

impl EmbeddingResult {
    /// Create a new embedding result, inferring the dimension from the first
    /// vector (0 when empty).
    pub fn new(embeddings: Vec<Vec<f32>>) -> Self {
        let dimension = embeddings.first().map(|e| e.len()).unwrap_or(0);
        Self {
            embeddings,
            dimension,
        }
    }

    /// Number of embedding vectors in this result.
    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    /// Returns `true` if this result contains no embedding vectors.
    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }
}

/// Type alias for cached model entries (model, dimension)
type ModelCacheEntry = (Arc<Mutex<TextEmbedding>>, usize);

/// Global cache for initialized embedding models to avoid reloading
static MODEL_CACHE: OnceLock<Mutex<HashMap<String, ModelCacheEntry>>> = OnceLock::new();

fn get_model_cache() -> &'static Mutex<HashMap<String, ModelCacheEntry>> {
    MODEL_CACHE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Trait for embedding providers that can generate embeddings from text.
///
/// Both document chunks and queries must go through the same provider so the
/// resulting vectors live in one space. Implementations must be
/// order-preserving: output vector `i` corresponds to input string `i`.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding for a single text
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts (batch processing)
    async fn embed_texts(&self, texts: &[String]) -> Result<EmbeddingResult>;

    /// Get the dimension of embeddings produced by this provider
    fn embedding_dimension(&self) -> usize;

    /// Get the name/identifier of this provider
    fn provider_name(&self) -> &str;
}

/// FastEmbed-based embedding provider using the built-in all-MiniLM-L6-v2
/// ONNX model (384 dimensions).
#[derive(Clone)]
pub struct FastEmbedProvider {
    model: Option<Arc<Mutex<TextEmbedding>>>,
    dimension: usize,
}

impl std::fmt::Debug for FastEmbedProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FastEmbedProvider")
            .field("model", &self.model.is_some())
            .field("dimension", &self.dimension)
            .finish()
    }
}

/// Cache key for the one built-in model this provider loads.
const MODEL_CACHE_KEY: &str = "all-MiniLM-L6-v2";

impl FastEmbedProvider {
    /// Creates a new uninitialized provider. Call [`initialize`](Self::initialize)
    /// before embedding.
    pub fn new() -> Self {
        Self {
            model: None,
            dimension: 384, // all-MiniLM-L6-v2
        }
    }

    /// Loads the embedding model, reusing the globally cached instance when
    /// one exists. This is the slow one-time step.
    pub async fn initialize(&mut self) -> Result<()> {
        // Check if the model is already cached
        let cached_data = {
            let cache = get_model_cache().lock().unwrap();
            cache
                .get(MODEL_CACHE_KEY)
                .map(|(model, dim)| (Arc::clone(model), *dim))
        };

        if let Some((cached_model, cached_dimension)) = cached_data {
            tracing::debug!("Using cached embedding model: {MODEL_CACHE_KEY}");
            self.model = Some(cached_model);
            self.dimension = cached_dimension;
            return Ok(());
        }

        // Load the model in a blocking task
        let (model, dimension) =
            tokio::task::spawn_blocking(move || -> Result<(TextEmbedding, usize)> {
                tracing::info!("Loading embedding model: {MODEL_CACHE_KEY}");

                let init_options = InitOptions::new(EmbeddingModel::AllMiniLML6V2)
                    .with_show_download_progress(false);

                let mut model = TextEmbedding::try_new(init_options)
                    .map_err(|e| EmbedError::External { source: e })?;

                // Get dimension by generating a test embedding
                let test_embeddings = model
                    .embed(vec!["test".to_string()], None)
                    .map_err(|e| EmbedError::External { source: e })?;
                let dimension = test_embeddings.first().map(|emb| emb.len()).unwrap_or(384);

                tracing::info!("Model loaded successfully. Dimension: {dimension}");
                Ok((model, dimension))
            })
            .await??;

        let model_arc = Arc::new(Mutex::new(model));
        {
            let mut cache = get_model_cache().lock().unwrap();
            cache.insert(MODEL_CACHE_KEY.to_string(), (Arc::clone(&model_arc), dimension));
        }

        self.model = Some(model_arc);
        self.dimension = dimension;
        Ok(())
    }

    /// Creates and initializes a provider in one step.
    pub async fn create() -> Result<Self> {
        let mut provider = Self::new();
        provider.initialize().await?;
        Ok(provider)
    }

    /// Clears the global model cache.
    pub fn clear_cache() {
        let mut cache_guard = get_model_cache().lock().unwrap();
        cache_guard.clear();
        tracing::info!("Model cache cleared");
    }

    /// Returns the number of cached models.
    pub fn cache_size() -> usize {
        get_model_cache().lock().unwrap().len()
    }
}

impl Default for FastEmbedProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingProvider for FastEmbedProvider {
    async fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let texts = vec![text.to_string()];
        let result = self.embed_texts(&texts).await?;
        result
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| EmbedError::invalid_config("No embedding generated for text"))
    }

    async fn embed_texts(&self, texts: &[String]) -> Result<EmbeddingResult> {
        if texts.is_empty() {
            return Ok(EmbeddingResult::new(vec![]));
        }

        let model = self.model.as_ref().ok_or_else(|| {
            EmbedError::invalid_config("Model not initialized. Call initialize() first.")
        })?;

        tracing::debug!("Generating embeddings for {} texts", texts.len());

        // Process in batches to avoid memory issues
        let batch_size = 16;
        let mut all_embeddings = Vec::new();

        for chunk in texts.chunks(batch_size) {
            let chunk = chunk.to_vec();
            let model_clone = Arc::clone(model);

            let batch_embeddings = tokio::task::spawn_blocking(move || -> Result<Vec<Vec<f32>>> {
                tracing::debug!("Processing batch of {} texts", chunk.len());

                let mut model_guard = model_clone.lock().unwrap();
                let embeddings = model_guard
                    .embed(chunk, None)
                    .map_err(|e| EmbedError::External { source: e })?;

                Ok(embeddings)
            })
            .await??;

            all_embeddings.extend(batch_embeddings);
        }

        tracing::debug!("Generated {} embeddings", all_embeddings.len());
        Ok(EmbeddingResult::new(all_embeddings))
    }

    fn embedding_dimension(&self) -> usize {
        self.dimension
    }

    fn provider_name(&self) -> &str {
        "fastembed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_result() {
        let embeddings = vec![vec![0.1, 0.2, 0.3], vec![0.4, 0.5, 0.6]];
        let result = EmbeddingResult::new(embeddings);

        assert_eq!(result.len(), 2);
        assert_eq!(result.dimension, 3);
        assert!(!result.is_empty());
    }

    #[test]
    fn test_empty_embedding_result() {
        let result = EmbeddingResult::new(vec![]);
        assert!(result.is_empty());
        assert_eq!(result.dimension, 0);
    }

    #[test]
    fn test_provider_defaults() {
        let provider = FastEmbedProvider::new();
        assert_eq!(provider.provider_name(), "fastembed");
        assert_eq!(provider.embedding_dimension(), 384);
    }

    #[tokio::test]
    async fn test_embed_before_initialize_fails() {
        let provider = FastEmbedProvider::new();
        let err = provider.embed_text("hello").await.unwrap_err();
        assert!(matches!(err, EmbedError::InvalidConfig { .. }));
    }

    #[tokio::test]
    async fn test_embed_empty_batch_is_empty_without_model() {
        // An empty batch short-circuits before touching the model.
        let provider = FastEmbedProvider::new();
        let result = provider.embed_texts(&[]).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    #[ignore] // Integration test: downloads the real MiniLM model - run with: cargo test -- --ignored
    async fn test_minilm_download_and_embedding() -> Result<()> {
        let provider = FastEmbedProvider::create().await?;
        assert_eq!(provider.embedding_dimension(), 384);

        let texts = vec![
            "Knee surgery is covered after a three month waiting period.".to_string(),
            "Dental cleanings are free twice a year.".to_string(),
        ];
        let result = provider.embed_texts(&texts).await?;
        assert_eq!(result.len(), 2);
        assert_eq!(result.dimension, 384);
        for embedding in &result.embeddings {
            assert!(embedding.iter().all(|v| v.is_finite()));
            assert!(embedding.iter().any(|v| *v != 0.0));
        }

        // Same model instance serves queries, so a second provider is cheap.
        assert!(FastEmbedProvider::cache_size() >= 1);
        let provider2 = FastEmbedProvider::create().await?;
        let query = provider2.embed_text("Is knee surgery covered?").await?;
        assert_eq!(query.len(), 384);
        Ok(())
    }
}
