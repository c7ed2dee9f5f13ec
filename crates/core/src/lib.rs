pub mod content;
pub mod error;
pub mod generation;
pub mod subject;
pub mod user;
pub mod validate;

// 导出让外部使用
pub use content::*;
pub use error::*;
pub use generation::*;
pub use subject::*;
pub use user::*;
