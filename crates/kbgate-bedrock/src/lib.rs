//! KBGate Bedrock - Knowledge base generation client
//!
//! Thin wrapper around the Amazon Bedrock Agent Runtime
//! `RetrieveAndGenerate` operation. Retrieval, ranking and generation all
//! happen inside the managed service; this crate only builds the request and
//! hands back the generated text.

pub mod client;

pub use client::{default_credentials, BedrockKbClient};
