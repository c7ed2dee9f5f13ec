use crate::llm::ModelBackend;
use std::sync::Arc;
use std::time::Duration;
use study_core::{GenerationConfig, Instruction, InvocationFailure, GENERATION_CONFIG};

/// 生成调用器 (Generation Invoker)
///
/// 持有注入的 Backend 和固定解码参数，每次调用独立，给每次出站调用套一个超时。
/// 外层 future 被丢弃 (客户端断开) 时出站请求随之取消。
#[derive(Clone)]
pub struct Invoker {
    backend: Arc<dyn ModelBackend>,
    config: GenerationConfig,
    timeout: Duration,
}

impl Invoker {
    pub fn new(backend: Arc<dyn ModelBackend>, timeout: Duration) -> Self {
        Self {
            backend,
            config: GENERATION_CONFIG,
            timeout,
        }
    }

    pub fn provider(&self) -> &str {
        self.backend.provider()
    }

    pub async fn invoke(&self, instruction: &Instruction) -> Result<String, InvocationFailure> {
        match tokio::time::timeout(
            self.timeout,
            self.backend.generate(instruction.as_str(), &self.config),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(InvocationFailure::timeout(format!(
                "request timed out after {}s",
                self.timeout.as_secs_f32()
            ))),
        }
    }
}
