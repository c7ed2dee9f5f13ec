use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// 学科记录 (Subject)
///
/// 对应数据库表: `subjects`，只归属一个用户
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    #[serde(rename = "_id")]
    pub id: i64,

    /// 所属用户 ID
    #[serde(rename = "user")]
    pub user_id: i64,

    pub title: String,

    pub description: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSubject {
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
}
