use crate::error::{GenerationError, Result};
use crate::generator::{Generation, TextGenerator};
use crate::usage::TokenUsage;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_bedrockruntime::error::DisplayErrorContext;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, InferenceConfiguration, Message,
};
use aws_sdk_bedrockruntime::Client;
use aws_types::region::Region;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_MODEL: &str = "anthropic.claude-3-sonnet-20240229-v1:0";
pub const DEFAULT_MAX_TOKENS: i32 = 4000;
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// Bedrock request settings
#[derive(Debug, Clone, PartialEq)]
pub struct BedrockConfig {
    pub region: String,
    pub model_id: String,
    pub max_tokens: i32,
    pub temperature: f32,
}

impl Default for BedrockConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            model_id: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl BedrockConfig {
    pub fn validate(&self) -> Result<()> {
        if self.region.trim().is_empty() {
            return Err(GenerationError::config("region is empty"));
        }
        if self.model_id.trim().is_empty() {
            return Err(GenerationError::config("model id is empty"));
        }
        if self.max_tokens <= 0 {
            return Err(GenerationError::config(format!(
                "max_tokens must be positive, got {}",
                self.max_tokens
            )));
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(GenerationError::config(format!(
                "temperature must be within 0.0..=1.0, got {}",
                self.temperature
            )));
        }
        Ok(())
    }
}

/// Text generator backed by the Bedrock Converse API
pub struct BedrockGenerator {
    client: Client,
    config: BedrockConfig,
}

impl BedrockGenerator {
    /// Load AWS credentials from the default provider chain
    pub async fn connect(config: BedrockConfig) -> Result<Self> {
        config.validate()?;
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;
        log::debug!("Bedrock runtime client ready in {}", config.region);
        Ok(Self {
            client: Client::new(&sdk_config),
            config,
        })
    }

    pub fn config(&self) -> &BedrockConfig {
        &self.config
    }
}

#[async_trait]
impl TextGenerator for BedrockGenerator {
    async fn generate(&self, prompt: &str) -> Result<Generation> {
        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(prompt.to_string()))
            .build()
            .map_err(|e| GenerationError::request(format!("Failed to build message: {e}")))?;

        let inference = InferenceConfiguration::builder()
            .max_tokens(self.config.max_tokens)
            .temperature(self.config.temperature)
            .build();

        log::info!("Sending request to Amazon Bedrock ({})", self.config.model_id);
        let response = self
            .client
            .converse()
            .model_id(&self.config.model_id)
            .messages(message)
            .inference_config(inference)
            .send()
            .await
            .map_err(|e| GenerationError::request(DisplayErrorContext(&e).to_string()))?;

        let text = response
            .output()
            .and_then(|output| output.as_message().ok())
            .map(|message| {
                message
                    .content()
                    .iter()
                    .filter_map(|block| block.as_text().ok())
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            log::error!("Bedrock response carried no text content: {response:?}");
            return Err(GenerationError::Empty);
        }

        let usage = response
            .usage()
            .map(|usage| {
                TokenUsage::new(
                    u64::try_from(usage.input_tokens()).unwrap_or_default(),
                    u64::try_from(usage.output_tokens()).unwrap_or_default(),
                )
            })
            .unwrap_or_default();

        Ok(Generation { text, usage })
    }

    fn describe(&self) -> String {
        format!("Amazon Bedrock {} ({})", self.config.model_id, self.config.region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = BedrockConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_tokens, 4000);
    }

    #[test]
    fn rejects_bad_settings() {
        let config = BedrockConfig {
            temperature: 1.5,
            ..BedrockConfig::default()
        };
        assert!(matches!(config.validate(), Err(GenerationError::Config(_))));

        let config = BedrockConfig {
            model_id: " ".into(),
            ..BedrockConfig::default()
        };
        assert!(matches!(config.validate(), Err(GenerationError::Config(_))));
    }
}
