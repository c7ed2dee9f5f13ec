use crate::config::{LlmSettings, ProviderKind};
use async_trait::async_trait;
use std::sync::Arc;
use study_core::{GenerationConfig, InvocationFailure, StudyError};

pub mod gemini;
pub mod openai;

/// 模型后端抽象接口 (ModelBackend)
///
/// 该 Trait 定义了与外部文本生成模型交互的唯一入口。
///
/// # 线程安全
/// 继承 `Send + Sync`，以 `Arc<dyn ModelBackend>` 的形式放进 Web 服务的共享状态，
/// 所有请求共用同一个只读实例 (包括其内部的 HTTP 连接池)。
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Provider 的展示名，会出现在给客户端的错误消息里 (e.g. "Gemini")
    fn provider(&self) -> &str;

    /// 执行一次生成请求
    ///
    /// 不重试、不分批、不流式。除了这一次出站调用之外没有副作用。
    ///
    /// # 参数 (Arguments)
    ///
    /// * `instruction` - 渲染完成的完整指令。
    /// * `config` - 固定的解码参数。
    ///
    /// # 返回值 (Returns)
    ///
    /// * `Ok(String)` - 模型返回的原始文本，可能为空，由上层校验。
    /// * `Err(InvocationFailure)` - 网络、鉴权、配额、请求格式等任何失败。
    async fn generate(
        &self,
        instruction: &str,
        config: &GenerationConfig,
    ) -> Result<String, InvocationFailure>;
}

/// 按配置构造 Backend，启动时调用一次
pub fn build_backend(settings: &LlmSettings) -> Result<Arc<dyn ModelBackend>, StudyError> {
    settings.validate()?;
    let backend: Arc<dyn ModelBackend> = match settings.provider {
        ProviderKind::Gemini => Arc::new(gemini::GeminiBackend::new(settings)?),
        ProviderKind::Openai => Arc::new(openai::OpenAiBackend::new(settings)),
    };
    tracing::info!(
        provider = backend.provider(),
        model = settings.model(),
        "LLM backend initialized"
    );
    Ok(backend)
}
