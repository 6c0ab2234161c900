//! Bedrock knowledge base client
//!
//! Each call to [`BedrockKbClient::generate`] issues exactly one
//! `RetrieveAndGenerate` request. SDK retries are disabled and no timeout
//! beyond the transport default is applied.

use async_trait::async_trait;
use aws_credential_types::provider::SharedCredentialsProvider;
use aws_sdk_bedrockagentruntime::{
    config::{retry::RetryConfig, BehaviorVersion, Region},
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
    types::{
        KnowledgeBaseRetrieveAndGenerateConfiguration, RetrieveAndGenerateConfiguration,
        RetrieveAndGenerateInput, RetrieveAndGenerateType,
    },
    Client, Config,
};
use kbgate_core::{compose_input, AnswerGenerator, BedrockConfig, KbGateError, Result};

/// Bedrock Agent Runtime client bound to one knowledge base and model
#[derive(Debug, Clone)]
pub struct BedrockKbClient {
    client: Client,
    region: String,
    knowledge_base_id: String,
    model_arn: String,
}

impl BedrockKbClient {
    /// Create a client for the configured region.
    ///
    /// Fails with [`KbGateError::Configuration`] when no region is given.
    /// Knowledge base id and model ARN are not checked here; if they are
    /// missing, individual calls fail instead.
    pub fn new(settings: &BedrockConfig, credentials: SharedCredentialsProvider) -> Result<Self> {
        let region = settings.region.trim();
        if region.is_empty() {
            return Err(KbGateError::Configuration(
                "AWS_REGION is required but not provided".to_string(),
            ));
        }

        tracing::info!(region, "Creating Bedrock client");

        let mut builder = Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(credentials)
            .retry_config(RetryConfig::disabled());

        if let Some(url) = &settings.endpoint_url {
            tracing::debug!(endpoint = %url, "Using Bedrock endpoint override");
            builder = builder.endpoint_url(url);
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
            region: region.to_string(),
            knowledge_base_id: settings.knowledge_base_id.clone(),
            model_arn: settings.model_arn.clone(),
        })
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn knowledge_base_id(&self) -> &str {
        &self.knowledge_base_id
    }

    pub fn model_arn(&self) -> &str {
        &self.model_arn
    }

    /// Call `RetrieveAndGenerate` with the already composed input text
    pub async fn retrieve_and_generate(&self, input_text: String) -> Result<String> {
        let input = RetrieveAndGenerateInput::builder()
            .text(input_text)
            .build()
            .map_err(|e| KbGateError::Upstream(format!("Invalid request input: {e}")))?;

        let knowledge_base = KnowledgeBaseRetrieveAndGenerateConfiguration::builder()
            .knowledge_base_id(&self.knowledge_base_id)
            .model_arn(&self.model_arn)
            .build()
            .map_err(|e| KbGateError::Upstream(format!("Invalid knowledge base config: {e}")))?;

        let configuration = RetrieveAndGenerateConfiguration::builder()
            .r#type(RetrieveAndGenerateType::KnowledgeBase)
            .knowledge_base_configuration(knowledge_base)
            .build()
            .map_err(|e| KbGateError::Upstream(format!("Invalid generation config: {e}")))?;

        let response = self
            .client
            .retrieve_and_generate()
            .input(input)
            .retrieve_and_generate_configuration(configuration)
            .send()
            .await
            .map_err(|e| KbGateError::Upstream(describe_sdk_error(&e)))?;

        Ok(response
            .output()
            .map(|output| output.text().to_string())
            .unwrap_or_default())
    }
}

#[async_trait]
impl AnswerGenerator for BedrockKbClient {
    async fn generate(&self, query: &str, instruction: &str) -> Result<String> {
        self.retrieve_and_generate(compose_input(instruction, query))
            .await
    }
}

/// Resolve credentials through the standard AWS provider chain
/// (environment, profile, web identity, container and instance metadata).
pub async fn default_credentials() -> SharedCredentialsProvider {
    let chain = aws_config::default_provider::credentials::default_provider().await;
    SharedCredentialsProvider::new(chain)
}

/// Render an SDK failure as the service's message, falling back to the
/// error code and then the full error chain
fn describe_sdk_error<E, R>(err: &SdkError<E, R>) -> String
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match (err.message(), err.code()) {
        (Some(message), _) if !message.is_empty() => message.to_string(),
        (_, Some(code)) if !code.is_empty() => code.to_string(),
        _ => DisplayErrorContext(err).to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================
