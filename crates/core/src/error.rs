use crate::content::ContentType;
use serde::Serialize;
use strum::Display;
use thiserror::Error;

/// 启动阶段的配置错误
#[derive(Error, Debug)]
pub enum StudyError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// 邮箱已被其他用户占用
///
/// 存储层包在 `anyhow::Error` 里返回，调用方用 `downcast_ref` 识别。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("email '{0}' is already registered")]
pub struct DuplicateEmail(pub String);

// =================================================================
// 生成链路错误
// =================================================================

/// 调用外部模型失败的大类，仅用于日志，分类逻辑不依赖它
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    /// 网络 / 连接层失败
    Transport,
    /// Provider 返回了非 2xx
    Rejected,
    /// 响应体无法解析
    Decode,
    /// 请求参数在发出前就构造失败
    Malformed,
    /// 超过单次请求超时
    Timeout,
    /// Provider 拦截了 prompt (安全策略等)
    Blocked,
    Unknown,
}

/// 调用失败 (Invocation Failure)
///
/// `message` 是 Provider 给出的原始文本 (可能没有)，分类只看它。
#[derive(Error, Debug, Clone)]
#[error("{kind}: {}", .message.as_deref().unwrap_or("no message"))]
pub struct InvocationFailure {
    pub kind: FailureKind,
    pub message: Option<String>,
}

impl InvocationFailure {
    pub fn new(kind: FailureKind, message: Option<String>) -> Self {
        // 空白消息等价于没有消息
        let message = message.filter(|m| !m.trim().is_empty());
        Self { kind, message }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Transport, Some(message.into()))
    }

    pub fn rejected(message: Option<String>) -> Self {
        Self::new(FailureKind::Rejected, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Decode, Some(message.into()))
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Malformed, Some(message.into()))
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Timeout, Some(message.into()))
    }

    pub fn blocked(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Blocked, Some(message.into()))
    }
}

/// 一次生成请求在任意阶段可能产生的错误
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("The \"prompt\" field is required.")]
    MissingPrompt,

    #[error("The \"type\" field is required (e.g., \"notes\", \"quiz\", \"flashcards\").")]
    MissingType,

    #[error("Invalid \"type\" specified. Must be \"notes\", \"quiz\", or \"flashcards\".")]
    InvalidType(String),

    #[error("Unsupported content type.")]
    UnsupportedType(String),

    #[error("Provider invocation failed: {0}")]
    Invocation(#[from] InvocationFailure),

    #[error("Empty response received for {0}")]
    EmptyResult(ContentType),
}

// =================================================================
// 面向客户端的错误分类
// =================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum ErrorCategory {
    MissingPrompt,
    MissingType,
    InvalidType,
    UnsupportedType,
    Authentication,
    QuotaExceeded,
    ProviderError,
    UnknownError,
    EmptyResult,
}

impl ErrorCategory {
    /// 每个分类固定对应一个 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorCategory::MissingPrompt
            | ErrorCategory::MissingType
            | ErrorCategory::InvalidType
            | ErrorCategory::UnsupportedType => 400,
            ErrorCategory::Authentication => 401,
            ErrorCategory::QuotaExceeded => 429,
            ErrorCategory::ProviderError
            | ErrorCategory::UnknownError
            | ErrorCategory::EmptyResult => 500,
        }
    }
}

/// 归一化后的错误: 分类 + 给客户端的消息 + 状态码
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("[{status_code}] {category}: {message}")]
pub struct ClassifiedError {
    pub category: ErrorCategory,
    pub message: String,
    pub status_code: u16,
}

impl ClassifiedError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            status_code: category.status_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_message_is_treated_as_absent() {
        let failure = InvocationFailure::new(FailureKind::Unknown, Some("   ".to_string()));
        assert!(failure.message.is_none());
        assert_eq!(failure.to_string(), "unknown: no message");
    }

    #[test]
    fn classified_error_takes_status_from_category() {
        let err = ClassifiedError::new(ErrorCategory::QuotaExceeded, "slow down");
        assert_eq!(err.status_code, 429);
        assert_eq!(ClassifiedError::new(ErrorCategory::InvalidType, "x").status_code, 400);
    }
}
