use crate::store::SubjectStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::MySqlPool;
use study_core::{NewSubject, Subject};

#[derive(Clone)]
pub struct SubjectRepository {
    pool: MySqlPool,
}

impl SubjectRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn find_owned(&self, id: i64, user_id: i64) -> Result<Option<Subject>> {
        let subject = sqlx::query_as::<_, Subject>(
            r#"
            SELECT id, user_id, title, description, created_at, updated_at
            FROM subjects
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subject)
    }
}

#[async_trait]
impl SubjectStore for SubjectRepository {
    async fn list_by_owner(&self, user_id: i64) -> Result<Vec<Subject>> {
        let subjects = sqlx::query_as::<_, Subject>(
            r#"
            SELECT id, user_id, title, description, created_at, updated_at
            FROM subjects
            WHERE user_id = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(subjects)
    }

    async fn create(&self, subject: NewSubject) -> Result<Subject> {
        let result = sqlx::query(
            "INSERT INTO subjects (user_id, title, description) VALUES (?, ?, ?)",
        )
        .bind(subject.user_id)
        .bind(&subject.title)
        .bind(&subject.description)
        .execute(&self.pool)
        .await
        .context("Failed to insert subject")?;

        let id = result.last_insert_id() as i64;
        self.find_owned(id, subject.user_id)
            .await?
            .with_context(|| format!("Subject {} vanished right after insert", id))
    }

    async fn delete_owned(&self, id: i64, user_id: i64) -> Result<Option<Subject>> {
        // 先查后删，放在一个事务里，返回被删除的记录
        let mut tx = self.pool.begin().await?;

        let subject = sqlx::query_as::<_, Subject>(
            r#"
            SELECT id, user_id, title, description, created_at, updated_at
            FROM subjects
            WHERE id = ? AND user_id = ?
            FOR UPDATE
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        if subject.is_some() {
            sqlx::query("DELETE FROM subjects WHERE id = ? AND user_id = ?")
                .bind(id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(subject)
    }
}
