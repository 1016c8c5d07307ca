//! Text embeddings for the semantic matcher.
//!
//! The handle initializes its model lazily and at most once. A failed
//! initialization is logged a single time and the handle then reports no
//! model, so callers fall back to lexical scoring.

use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::warn;

use crate::error::MatcherError;
use crate::utils::normalize_text;

/// Produces a fixed-width vector for a piece of text.
pub trait EmbeddingModel: Send + Sync {
    fn name(&self) -> &str;

    fn embed(&self, text: &str) -> Result<Vec<f32>, MatcherError>;
}

type Loader = Box<dyn Fn() -> Result<Arc<dyn EmbeddingModel>, MatcherError> + Send + Sync>;

/// Lazily initialized, shareable embedding model.
pub struct EmbeddingHandle {
    loader: Loader,
    model: OnceLock<Option<Arc<dyn EmbeddingModel>>>,
}

impl EmbeddingHandle {
    /// Defers model construction until the first lookup.
    pub fn lazy<F>(loader: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn EmbeddingModel>, MatcherError> + Send + Sync + 'static,
    {
        Self {
            loader: Box::new(loader),
            model: OnceLock::new(),
        }
    }

    /// Wraps an already constructed model.
    pub fn ready(model: Arc<dyn EmbeddingModel>) -> Self {
        let handle = Self::lazy(|| {
            Err(MatcherError::Unavailable {
                matcher: "EmbeddingHandle".to_string(),
                message: "model was supplied eagerly".to_string(),
            })
        });
        let _ = handle.model.set(Some(model));
        handle
    }

    /// Handle over the built-in [`NgramEmbedder`].
    pub fn ngram() -> Self {
        Self::ready(Arc::new(NgramEmbedder::default()))
    }

    /// The model, or `None` if initialization failed.
    pub fn get(&self) -> Option<&Arc<dyn EmbeddingModel>> {
        self.model
            .get_or_init(|| match (self.loader)() {
                Ok(model) => Some(model),
                Err(error) => {
                    warn!(%error, "embedding model unavailable, using lexical scoring only");
                    None
                }
            })
            .as_ref()
    }
}

impl fmt::Debug for EmbeddingHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.model.get() {
            None => "uninitialized",
            Some(None) => "unavailable",
            Some(Some(_)) => "ready",
        };
        f.debug_struct("EmbeddingHandle").field("state", &state).finish()
    }
}

/// Cosine similarity clamped to [0, 1]. Mismatched or zero vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f64;
    let mut na = 0.0f64;
    let mut nb = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    (dot / (na.sqrt() * nb.sqrt())).clamp(0.0, 1.0)
}

/// Hashed character-trigram embedding.
///
/// Each padded, normalized word contributes its trigrams to one of
/// `dimensions` buckets (FNV-1a). Deterministic, no model files.
#[derive(Debug, Clone)]
pub struct NgramEmbedder {
    dimensions: usize,
}

impl NgramEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(16),
        }
    }

    fn bucket(&self, gram: &[u8]) -> usize {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in gram {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x0100_0000_01b3);
        }
        (hash % self.dimensions as u64) as usize
    }
}

impl Default for NgramEmbedder {
    fn default() -> Self {
        Self::new(256)
    }
}

impl EmbeddingModel for NgramEmbedder {
    fn name(&self) -> &str {
        "char-trigram"
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, MatcherError> {
        let mut vector = vec![0.0f32; self.dimensions];
        for word in normalize_text(text).split_whitespace() {
            let padded = format!("#{word}#");
            let bytes = padded.as_bytes();
            if bytes.len() < 3 {
                continue;
            }
            for gram in bytes.windows(3) {
                vector[self.bucket(gram)] += 1.0;
            }
        }
        Ok(vector)
    }
}
