//! 错误分类器 (Error Classifier)
//!
//! 把生成链路上的任意失败归一成 `ClassifiedError`。
//!
//! Provider 的错误面被当作不透明文本处理，认证 / 配额的判断只靠子串匹配，
//! 和上游的措辞强耦合，只能算尽力而为的启发式规则。匹配逻辑全部收在
//! [`classify_invocation`] 里，以后 Provider 提供结构化错误码时只需替换这一个函数。

use study_core::{ClassifiedError, ErrorCategory, GenerationError, InvocationFailure};

/// 凭证无效 / 缺失
const AUTH_MARKERS: &[&str] = &[
    "api key not valid",
    "api_key_invalid",
    "incorrect api key",
    "invalid_api_key",
];

/// 配额 / 限流
const QUOTA_MARKERS: &[&str] = &["quota", "resource_exhausted", "rate limit"];

fn mentions_any(message: &str, markers: &[&str]) -> bool {
    let lowered = message.to_lowercase();
    markers.iter().any(|m| lowered.contains(m))
}

/// 对调用失败做分类，按顺序命中第一条即返回:
/// 1. 凭证问题 -> 401
/// 2. 配额问题 -> 429
/// 3. 其他有消息的 -> 500，消息带上 Provider 前缀
/// 4. 没有消息 -> 500，通用消息
pub fn classify_invocation(failure: &InvocationFailure, provider: &str) -> ClassifiedError {
    match failure.message.as_deref() {
        Some(msg) if mentions_any(msg, AUTH_MARKERS) => ClassifiedError::new(
            ErrorCategory::Authentication,
            format!("Authentication failed: Invalid or missing {provider} API key."),
        ),
        Some(msg) if mentions_any(msg, QUOTA_MARKERS) => ClassifiedError::new(
            ErrorCategory::QuotaExceeded,
            format!(
                "Quota exceeded: You have reached your {provider} API usage limit. Please try again later."
            ),
        ),
        Some(msg) => ClassifiedError::new(
            ErrorCategory::ProviderError,
            format!("{provider} API Error: {msg}"),
        ),
        None => ClassifiedError::new(
            ErrorCategory::UnknownError,
            format!("Failed to generate content via {provider} API."),
        ),
    }
}

/// 任意生成错误 -> 唯一一个 `ClassifiedError`
pub fn classify(err: &GenerationError, provider: &str) -> ClassifiedError {
    match err {
        GenerationError::MissingPrompt => {
            ClassifiedError::new(ErrorCategory::MissingPrompt, err.to_string())
        }
        GenerationError::MissingType => {
            ClassifiedError::new(ErrorCategory::MissingType, err.to_string())
        }
        GenerationError::InvalidType(_) => {
            ClassifiedError::new(ErrorCategory::InvalidType, err.to_string())
        }
        GenerationError::UnsupportedType(_) => {
            ClassifiedError::new(ErrorCategory::UnsupportedType, err.to_string())
        }
        GenerationError::Invocation(failure) => classify_invocation(failure, provider),
        GenerationError::EmptyResult(kind) => ClassifiedError::new(
            ErrorCategory::EmptyResult,
            format!("Failed to generate {kind}: Empty response received from {provider}."),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use study_core::{ContentType, FailureKind};

    fn failure(message: Option<&str>) -> InvocationFailure {
        InvocationFailure::rejected(message.map(str::to_string))
    }

    #[test]
    fn invalid_key_maps_to_401() {
        let err = classify_invocation(
            &failure(Some("API key not valid. Please pass a valid API key.")),
            "Gemini",
        );
        assert_eq!(err.category, ErrorCategory::Authentication);
        assert_eq!(err.status_code, 401);
        assert_eq!(
            err.message,
            "Authentication failed: Invalid or missing Gemini API key."
        );
    }

    #[test]
    fn quota_maps_to_429() {
        let err = classify_invocation(
            &failure(Some("You exceeded your current quota, please check your plan")),
            "Gemini",
        );
        assert_eq!(err.category, ErrorCategory::QuotaExceeded);
        assert_eq!(err.status_code, 429);
    }

    #[test]
    fn credential_rule_wins_over_quota_rule() {
        let err = classify_invocation(
            &failure(Some("API key not valid; quota cannot be checked")),
            "Gemini",
        );
        assert_eq!(err.status_code, 401);
    }

    #[test]
    fn matching_ignores_case() {
        let err = classify_invocation(&failure(Some("RESOURCE_EXHAUSTED")), "Gemini");
        assert_eq!(err.status_code, 429);
        let err = classify_invocation(&failure(Some("Incorrect API key provided")), "OpenAI");
        assert_eq!(err.status_code, 401);
    }

    #[test]
    fn other_messages_are_provider_errors_with_prefix() {
        let err = classify_invocation(&failure(Some("model overloaded")), "Gemini");
        assert_eq!(err.category, ErrorCategory::ProviderError);
        assert_eq!(err.status_code, 500);
        assert_eq!(err.message, "Gemini API Error: model overloaded");
    }

    #[test]
    fn bare_status_line_is_classified_by_text_only() {
        // 分类只看消息文本，状态行里没有关键词就按 Provider 错误处理
        let err = classify_invocation(&failure(Some("429 Too Many Requests")), "Gemini");
        assert_eq!(err.category, ErrorCategory::ProviderError);
        assert_eq!(err.message, "Gemini API Error: 429 Too Many Requests");

        let err = classify_invocation(
            &failure(Some("429 Too Many Requests: rate limit reached")),
            "Gemini",
        );
        assert_eq!(err.category, ErrorCategory::QuotaExceeded);
    }

    #[test]
    fn no_message_is_unknown() {
        let err = classify_invocation(&InvocationFailure::new(FailureKind::Unknown, None), "Gemini");
        assert_eq!(err.category, ErrorCategory::UnknownError);
        assert_eq!(err.status_code, 500);
        assert_eq!(err.message, "Failed to generate content via Gemini API.");
    }

    #[test]
    fn timeout_is_a_provider_error() {
        let err = classify(
            &GenerationError::Invocation(InvocationFailure::timeout("request timed out after 60s")),
            "Gemini",
        );
        assert_eq!(err.category, ErrorCategory::ProviderError);
    }

    #[test]
    fn empty_result_is_500_and_names_the_type() {
        let err = classify(&GenerationError::EmptyResult(ContentType::Flashcards), "Gemini");
        assert_eq!(err.category, ErrorCategory::EmptyResult);
        assert_eq!(err.status_code, 500);
        assert_eq!(
            err.message,
            "Failed to generate flashcards: Empty response received from Gemini."
        );
    }

    #[test]
    fn input_errors_are_400() {
        let cases = [
            GenerationError::MissingPrompt,
            GenerationError::MissingType,
            GenerationError::InvalidType("essay".to_string()),
            GenerationError::UnsupportedType("essay".to_string()),
        ];
        for case in &cases {
            assert_eq!(classify(case, "Gemini").status_code, 400);
        }
        assert!(classify(&cases[0], "Gemini").message.contains("\"prompt\""));
        assert!(classify(&cases[2], "Gemini").message.contains("Invalid \"type\""));
    }
}
