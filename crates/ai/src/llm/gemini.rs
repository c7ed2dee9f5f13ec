use crate::config::LlmSettings;
use crate::llm::ModelBackend;
use async_trait::async_trait;
use reqwest::header;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use study_core::{GenerationConfig, InvocationFailure, StudyError};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

// ==========================================
// 1. 响应结构体
// ==========================================

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    // 对应 JSON 中的 "promptFeedback"，prompt 被拦截时没有 candidates
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    // 被安全策略截断时 content 可能缺失
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl GeminiResponse {
    /// 取第一个 candidate 的全部文本片段并拼接，可能得到空串
    fn into_text(self) -> Result<String, InvocationFailure> {
        if self.candidates.is_empty() {
            if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
                return Err(InvocationFailure::blocked(format!(
                    "prompt blocked by provider: {reason}"
                )));
            }
            return Ok(String::new());
        }

        let text = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default();
        Ok(text)
    }
}

/// 从错误响应体中取出 Provider 自己的消息。
/// 解析不了就用整个响应体，响应体为空则没有消息。
fn extract_error_message(body: &str) -> Option<String> {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        if let Some(message) = envelope.error.and_then(|e| e.message) {
            return Some(message);
        }
    }
    let trimmed = body.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// ==========================================
// 2. 实现 Gemini Backend
// ==========================================

pub struct GeminiBackend {
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiBackend {
    /// 用注入的配置创建实例，密钥缺失或非法时返回配置错误
    pub fn new(settings: &LlmSettings) -> Result<Self, StudyError> {
        let mut key = header::HeaderValue::from_str(settings.api_key.trim()).map_err(|_| {
            StudyError::ConfigError("Gemini API key contains invalid characters".to_string())
        })?;
        // 标记为敏感信息，日志中不打印
        key.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert("x-goog-api-key", key);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        // 整体超时由调用方控制，这里只限制建连
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| StudyError::ConfigError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            model: settings.model().to_string(),
            base_url: settings
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            client,
        })
    }

    fn endpoint(&self) -> String {
        let model_path = if self.model.starts_with("models/") {
            self.model.clone()
        } else {
            format!("models/{}", self.model)
        };
        format!(
            "{}/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model_path
        )
    }
}

#[async_trait]
impl ModelBackend for GeminiBackend {
    fn provider(&self) -> &str {
        "Gemini"
    }

    async fn generate(
        &self,
        instruction: &str,
        config: &GenerationConfig,
    ) -> Result<String, InvocationFailure> {
        let request_body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": instruction }]
            }],
            "generationConfig": {
                "temperature": config.temperature,
                "topP": config.top_p,
                "topK": config.top_k,
                "maxOutputTokens": config.max_output_tokens
            }
        });

        tracing::debug!("Sending request to Gemini model: {}", self.model);
        let res = self
            .client
            .post(self.endpoint())
            .json(&request_body)
            .send()
            .await
            .map_err(|e| InvocationFailure::transport(e.to_string()))?;

        let status = res.status();
        let payload = res
            .text()
            .await
            .map_err(|e| InvocationFailure::transport(e.to_string()))?;

        if !status.is_success() {
            // 响应体为空时退回到状态行，例如 "503 Service Unavailable"
            let message = extract_error_message(&payload).unwrap_or_else(|| status.to_string());
            return Err(InvocationFailure::rejected(Some(message)));
        }

        let response_data: GeminiResponse = serde_json::from_str(&payload).map_err(|e| {
            InvocationFailure::decode(format!("failed to parse Gemini response JSON: {e}"))
        })?;

        response_data.into_text()
    }
}

// ==========================================
// 3. 单元测试 (不走网络)
// ==========================================
