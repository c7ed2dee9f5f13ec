use crate::content::ContentType;
use crate::error::GenerationError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 客户端原始请求体 `{ prompt, type }`，字段都可能缺失
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGenerationRequest {
    #[serde(default)]
    pub prompt: Option<String>,

    #[serde(default, rename = "type")]
    pub content_type: Option<String>,
}

/// 校验通过后的生成请求，单次请求内有效，不持久化
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub content_type: ContentType,
}

impl TryFrom<RawGenerationRequest> for GenerationRequest {
    type Error = GenerationError;

    /// 校验顺序固定: prompt -> type 是否存在 -> type 是否合法
    fn try_from(raw: RawGenerationRequest) -> Result<Self, Self::Error> {
        let prompt = match raw.prompt {
            Some(p) if !p.trim().is_empty() => p,
            _ => return Err(GenerationError::MissingPrompt),
        };

        let tag = match raw.content_type {
            Some(t) if !t.is_empty() => t,
            _ => return Err(GenerationError::MissingType),
        };

        let content_type =
            ContentType::from_str(&tag).map_err(|_| GenerationError::InvalidType(tag))?;

        Ok(Self {
            prompt,
            content_type,
        })
    }
}

/// 发送给外部模型的完整指令文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction(String);

impl Instruction {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 解码参数
///
/// 进程级常量，不允许按请求修改。取值偏向事实性输出，同时保留适度多样性；
/// 输出长度有上限，避免无界的生成成本。
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

pub const GENERATION_CONFIG: GenerationConfig = GenerationConfig {
    temperature: 0.7,
    top_p: 0.9,
    top_k: 40,
    max_output_tokens: 1024,
};

impl Default for GenerationConfig {
    fn default() -> Self {
        GENERATION_CONFIG
    }
}

/// 生成结果，`text` 一定非空
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    #[serde(rename = "result")]
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(prompt: Option<&str>, kind: Option<&str>) -> RawGenerationRequest {
        RawGenerationRequest {
            prompt: prompt.map(str::to_string),
            content_type: kind.map(str::to_string),
        }
    }

    #[test]
    fn accepts_valid_request() {
        let req = GenerationRequest::try_from(raw(Some("Photosynthesis"), Some("notes"))).unwrap();
        assert_eq!(req.prompt, "Photosynthesis");
        assert_eq!(req.content_type, ContentType::Notes);
    }

    #[test]
    fn missing_prompt_is_reported_before_type() {
        let err = GenerationRequest::try_from(raw(None, Some("essay"))).unwrap_err();
        assert!(matches!(err, GenerationError::MissingPrompt));

        let err = GenerationRequest::try_from(raw(Some("  "), Some("quiz"))).unwrap_err();
        assert!(matches!(err, GenerationError::MissingPrompt));
    }

    #[test]
    fn missing_and_invalid_type_are_distinct() {
        let err = GenerationRequest::try_from(raw(Some("x"), None)).unwrap_err();
        assert!(matches!(err, GenerationError::MissingType));

        let err = GenerationRequest::try_from(raw(Some("x"), Some(""))).unwrap_err();
        assert!(matches!(err, GenerationError::MissingType));

        let err = GenerationRequest::try_from(raw(Some("x"), Some("essay"))).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidType(ref t) if t == "essay"));
    }

    #[test]
    fn raw_request_reads_type_field() {
        let raw: RawGenerationRequest =
            serde_json::from_str(r#"{"prompt":"cells","type":"flashcards"}"#).unwrap();
        assert_eq!(raw.content_type.as_deref(), Some("flashcards"));

        let raw: RawGenerationRequest = serde_json::from_str(r#"{"type":"quiz"}"#).unwrap();
        assert!(raw.prompt.is_none());
    }

    #[test]
    fn result_serializes_as_result_field() {
        let json = serde_json::to_value(GenerationResult {
            text: "done".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "result": "done" }));
    }
}
