use crate::classifier::classify;
use crate::invoker::Invoker;
use crate::llm::ModelBackend;
use crate::prompts::PromptTemplates;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use strum::Display;
use study_core::{
    ClassifiedError, ContentType, GenerationError, GenerationRequest, GenerationResult,
    RawGenerationRequest,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 一次生成请求所处的阶段
///
/// `ValidatingInput -> Selecting -> Invoking -> Validating -> Succeeded`，
/// 任一阶段失败直接进入 `Failed(ClassifiedError)`，不跨阶段重试。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    ValidatingInput,
    Selecting,
    Invoking,
    Validating,
    Succeeded,
}

/// 日志里的类型标签，客户端原始输入不进日志
fn type_label(tag: Option<&str>) -> &'static str {
    match tag {
        None | Some("") => "missing",
        Some(tag) => ContentType::from_str(tag)
            .map(|kind| kind.as_str())
            .unwrap_or("invalid"),
    }
}

/// 内容生成网关 (Gateway Orchestrator)
///
/// 只持有只读状态，可以 `Arc` 共享给任意多个并发请求；请求之间互不影响。
pub struct GenerationGateway {
    templates: PromptTemplates,
    invoker: Invoker,
}

impl GenerationGateway {
    pub fn new(backend: Arc<dyn ModelBackend>, timeout: Duration) -> Self {
        Self {
            templates: PromptTemplates::default(),
            invoker: Invoker::new(backend, timeout),
        }
    }

    pub fn provider(&self) -> &str {
        self.invoker.provider()
    }

    /// 入口: 校验请求 -> 选模板 -> 调模型 -> 校验输出
    ///
    /// 日志只记录类型、阶段、分类和 prompt 长度，不记录 prompt 原文。
    pub async fn generate(
        &self,
        raw: RawGenerationRequest,
    ) -> Result<GenerationResult, ClassifiedError> {
        let trace_id = Uuid::new_v4();
        let requested_type = type_label(raw.content_type.as_deref());

        match self.run(trace_id, raw).await {
            Ok(result) => {
                info!(
                    %trace_id,
                    content_type = %requested_type,
                    result_chars = result.text.chars().count(),
                    stage = %Stage::Succeeded,
                    "Generation succeeded"
                );
                Ok(result)
            }
            Err((stage, err)) => {
                let classified = classify(&err, self.provider());
                warn!(
                    %trace_id,
                    content_type = %requested_type,
                    %stage,
                    category = %classified.category,
                    status = classified.status_code,
                    cause = %err,
                    "Generation failed"
                );
                Err(classified)
            }
        }
    }

    async fn run(
        &self,
        trace_id: Uuid,
        raw: RawGenerationRequest,
    ) -> Result<GenerationResult, (Stage, GenerationError)> {
        let request =
            GenerationRequest::try_from(raw).map_err(|e| (Stage::ValidatingInput, e))?;

        let kind = request.content_type;
        debug!(%trace_id, stage = %Stage::Selecting, content_type = %kind, prompt_chars = request.prompt.chars().count());
        let instruction = self.templates.render(kind, &request.prompt);

        info!(
            %trace_id,
            stage = %Stage::Invoking,
            content_type = %kind,
            provider = self.provider(),
            "⏳ Generating {}...",
            kind
        );
        let raw_text = self
            .invoker
            .invoke(&instruction)
            .await
            .map_err(|e| (Stage::Invoking, GenerationError::from(e)))?;

        debug!(%trace_id, stage = %Stage::Validating, content_type = %kind);
        crate::validator::ensure_content(raw_text, kind).map_err(|e| (Stage::Validating, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_label_never_echoes_client_input() {
        assert_eq!(type_label(Some("quiz")), "quiz");
        assert_eq!(type_label(None), "missing");
        assert_eq!(type_label(Some("")), "missing");
        let hostile = "x".repeat(10_000) + "\n\u{1b}[31m";
        assert_eq!(type_label(Some(&hostile)), "invalid");
    }
}
