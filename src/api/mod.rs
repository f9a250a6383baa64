pub mod cohere_api;
pub mod cohere_client;

use async_trait::async_trait;

use crate::error::CourierError;

pub use cohere_client::CohereClient;

/// A hosted model that turns one prompt into one text reply.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, CourierError>;

    fn name(&self) -> &str;
}
