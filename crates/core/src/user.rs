use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 新用户默认套餐
pub const DEFAULT_PLAN: &str = "free";

/// 用户实体 (User)
///
/// 对应数据库表: `users`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// 数据库物理主键 (自增 ID)，对外以 `_id` 暴露
    #[serde(rename = "_id")]
    pub id: i64,

    pub name: String,

    /// 登录邮箱，统一小写存储
    pub email: String,

    /// bcrypt 哈希，永远不出现在响应里
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// 套餐
    /// 示例: "free", "pro"
    pub plan: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// 注册时写入的字段，密码已经过哈希
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// 统一邮箱格式: 去掉首尾空白并转小写
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
