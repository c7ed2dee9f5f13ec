pub mod classifier;
pub mod config;
pub mod gateway;
pub mod invoker;
pub mod llm;
pub mod prompts;
pub mod validator;

pub use config::{LlmSettings, ProviderKind};
pub use gateway::{GenerationGateway, Stage};
pub use llm::{build_backend, ModelBackend};
pub use prompts::PromptTemplates;
