use super::ModelBackend;
use crate::config::LlmSettings;
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use std::time::Duration;
use study_core::{FailureKind, GenerationConfig, InvocationFailure};

/// OpenAI 兼容接口 (OpenAI / DeepSeek / OneAPI 等)
pub struct OpenAiBackend {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiBackend {
    pub fn new(settings: &LlmSettings) -> Self {
        let mut config = OpenAIConfig::new().with_api_key(settings.api_key.trim());
        if let Some(base_url) = &settings.base_url {
            config = config.with_api_base(base_url);
        }

        // async-openai 默认会对 429 做指数退避重试，这里关掉，配额错误直接交给上层
        let no_retry = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();

        Self {
            client: Client::with_config(config).with_backoff(no_retry),
            model: settings.model().to_string(),
        }
    }

    /// 固定解码参数映射到 chat completions 请求，top_k 不在该协议里，忽略
    fn build_request(
        &self,
        instruction: &str,
        config: &GenerationConfig,
    ) -> Result<CreateChatCompletionRequest, InvocationFailure> {
        let user_msg = ChatCompletionRequestUserMessageArgs::default()
            .content(instruction)
            .build()
            .map_err(failure_from)?;

        CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([user_msg.into()])
            .temperature(config.temperature)
            .top_p(config.top_p)
            .max_tokens(config.max_output_tokens)
            .build()
            .map_err(failure_from)
    }
}

fn failure_from(err: OpenAIError) -> InvocationFailure {
    match err {
        OpenAIError::ApiError(api) => InvocationFailure::rejected(Some(api.message)),
        OpenAIError::Reqwest(e) => InvocationFailure::transport(e.to_string()),
        OpenAIError::JSONDeserialize(e) => InvocationFailure::decode(e.to_string()),
        OpenAIError::InvalidArgument(msg) => InvocationFailure::malformed(msg),
        other => InvocationFailure::new(FailureKind::Unknown, Some(other.to_string())),
    }
}

#[async_trait]
impl ModelBackend for OpenAiBackend {
    fn provider(&self) -> &str {
        "OpenAI"
    }

    async fn generate(
        &self,
        instruction: &str,
        config: &GenerationConfig,
    ) -> Result<String, InvocationFailure> {
        let request = self.build_request(instruction, config)?;

        tracing::debug!("Sending request to LLM model: {}", self.model);
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(failure_from)?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        Ok(content)
    }
}
