use async_trait::async_trait;
use exportsmart_models::generation::GenerationRequest;

use crate::error::GenerationError;

/// A hosted text-generation backend. Mockable for testing.
///
/// Implementations perform one round trip per call: no retry, caching or timeout.
#[async_trait]
pub trait GenerationService: Send + Sync {
    fn name(&self) -> &str;

    /// Returns the generated text, or `None` when the service answered without content.
    async fn generate(&self, request: &GenerationRequest) -> Result<Option<String>, GenerationError>;
}
