//! Model gateway module
//!
//! Issues outbound calls to the hosted language model and normalizes every
//! result to plain text.

pub mod client;
pub mod outcome;
pub mod service;
pub mod transport;
pub mod wire;

// Re-export commonly used types
pub use client::{GeminiClient, DEFAULT_ENDPOINT, DEFAULT_MODEL};
pub use outcome::{ModelOutcome, Operation};
pub use service::{ModelGateway, DEFAULT_TEXT_TEMPERATURE};
pub use transport::ModelTransport;
pub use wire::{GenerateContentRequest, GenerateContentResponse};
