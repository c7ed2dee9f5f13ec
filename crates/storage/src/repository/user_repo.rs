use crate::store::UserStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;
use study_core::{DuplicateEmail, NewUser, User, DEFAULT_PLAN};

const USER_COLUMNS: &str =
    "id, name, email, password_hash, plan, created_at, updated_at";

/// 唯一索引冲突 (MySQL 1062) 转成 `DuplicateEmail`，其余错误原样带上下文
fn write_error(err: sqlx::Error, email: &str, action: &'static str) -> anyhow::Error {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DuplicateEmail(email.to_string()).into()
        }
        _ => anyhow::Error::new(err).context(action),
    }
}

#[derive(Clone)]
pub struct UserRepository {
    pool: MySqlPool,
}

impl UserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn create(&self, user: NewUser) -> Result<User> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash, plan)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(DEFAULT_PLAN)
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, &user.email, "Failed to insert user"))?;

        let id = result.last_insert_id() as i64;
        self.find_by_id(id)
            .await?
            .with_context(|| format!("User {} vanished right after insert", id))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn update_profile(&self, id: i64, name: &str, email: &str) -> Result<Option<User>> {
        sqlx::query("UPDATE users SET name = ?, email = ? WHERE id = ?")
            .bind(name)
            .bind(email)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(e, email, "Failed to update user profile"))?;

        // MySQL 在值未变化时 rows_affected 为 0，不能用它判断用户是否存在
        self.find_by_id(id).await
    }
}
