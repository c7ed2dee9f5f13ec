use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use strum::Display;
use study_core::StudyError;

/// 支持的模型提供方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Display, Default)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Gemini,
    Openai,
}

impl ProviderKind {
    /// 兼容老部署方式的环境变量名
    pub fn api_key_env(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "GEMINI_API_KEY",
            ProviderKind::Openai => "OPENAI_API_KEY",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini-2.5-flash",
            ProviderKind::Openai => "gpt-4o-mini",
        }
    }
}

/// --- LLM 环境配置 ---
/// 启动时构造一次，注入到具体的 Backend 中，不依赖任何全局状态
#[derive(Clone, Deserialize)]
pub struct LlmSettings {
    #[serde(default)]
    pub provider: ProviderKind,

    #[serde(default)]
    pub api_key: String,

    /// 为空时使用 provider 的默认模型
    #[serde(default)]
    pub model: Option<String>,

    /// 自定义 BaseUrl (代理 / 兼容网关)
    #[serde(default)]
    pub base_url: Option<String>,

    /// 单次调用超时
    #[serde(default = "LlmSettings::default_timeout_secs")]
    pub timeout_secs: u64,
}

impl LlmSettings {
    fn default_timeout_secs() -> u64 {
        60
    }

    pub fn new(provider: ProviderKind, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            model: None,
            base_url: None,
            timeout_secs: Self::default_timeout_secs(),
        }
    }

    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.provider.default_model())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// 启动期校验，缺少密钥直接给出明确的致命配置错误
    pub fn validate(&self) -> Result<(), StudyError> {
        if self.api_key.trim().is_empty() {
            return Err(StudyError::ConfigError(format!(
                "{} is not defined. Set it in the environment or the llm.api_key config entry.",
                self.provider.api_key_env()
            )));
        }
        if self.timeout_secs == 0 {
            return Err(StudyError::ConfigError(
                "llm.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

// 密钥不进日志
impl fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmSettings")
            .field("provider", &self.provider)
            .field("api_key", &"<redacted>")
            .field("model", &self.model())
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_is_a_config_error_naming_the_variable() {
        let settings = LlmSettings::new(ProviderKind::Gemini, "  ");
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, StudyError::ConfigError(_)));
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn debug_output_hides_the_key() {
        let settings = LlmSettings::new(ProviderKind::Openai, "sk-very-secret");
        let printed = format!("{settings:?}");
        assert!(!printed.contains("sk-very-secret"));
        assert!(printed.contains("gpt-4o-mini"));
    }

    #[test]
    fn blank_model_falls_back_to_default() {
        let mut settings = LlmSettings::new(ProviderKind::Gemini, "k");
        settings.model = Some(String::new());
        assert_eq!(settings.model(), "gemini-2.5-flash");
        settings.model = Some("gemini-2.5-pro".to_string());
        assert_eq!(settings.model(), "gemini-2.5-pro");
    }
}
