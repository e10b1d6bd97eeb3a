//! Transport seam between the gateway and the network

use crate::errors::Result;
use crate::gateway::wire::{GenerateContentRequest, GenerateContentResponse};
use async_trait::async_trait;

/// Issues exactly one `generateContent` call per invocation.
///
/// Implemented by [`GeminiClient`](crate::gateway::GeminiClient) for real
/// traffic; tests substitute recording or failing transports.
#[async_trait]
pub trait ModelTransport: Send + Sync {
    async fn generate_content(&self, request: &GenerateContentRequest) -> Result<GenerateContentResponse>;

    /// Model identifier used in log lines
    fn model(&self) -> &str;
}
