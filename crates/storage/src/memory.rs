use crate::store::{SubjectStore, UserStore};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use study_core::{DuplicateEmail, NewSubject, NewUser, Subject, User, DEFAULT_PLAN};
use tokio::sync::RwLock;

/// 内存版存储，用于测试和没有数据库的本地运行。进程退出即丢失。
#[derive(Default)]
pub struct MemoryUserStore {
    inner: RwLock<Table<User>>,
}

#[derive(Default)]
pub struct MemorySubjectStore {
    inner: RwLock<Table<Subject>>,
}

/// 自增主键 + 有序存储
struct Table<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: NewUser) -> Result<User> {
        let mut table = self.inner.write().await;
        // 与 MySQL 的唯一索引保持一致
        if table.rows.values().any(|u| u.email == user.email) {
            return Err(DuplicateEmail(user.email).into());
        }

        let now = Utc::now();
        let id = table.allocate_id();
        let record = User {
            id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            plan: DEFAULT_PLAN.to_string(),
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let table = self.inner.read().await;
        Ok(table.rows.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>> {
        Ok(self.inner.read().await.rows.get(&id).cloned())
    }

    async fn update_profile(&self, id: i64, name: &str, email: &str) -> Result<Option<User>> {
        let mut table = self.inner.write().await;
        if table.rows.values().any(|u| u.id != id && u.email == email) {
            return Err(DuplicateEmail(email.to_string()).into());
        }

        let Some(user) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        user.name = name.to_string();
        user.email = email.to_string();
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }
}

#[async_trait]
impl SubjectStore for MemorySubjectStore {
    async fn list_by_owner(&self, user_id: i64) -> Result<Vec<Subject>> {
        let table = self.inner.read().await;
        // id 单调递增，倒序即最新在前
        Ok(table
            .rows
            .values()
            .rev()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create(&self, subject: NewSubject) -> Result<Subject> {
        let mut table = self.inner.write().await;
        let now = Utc::now();
        let id = table.allocate_id();
        let record = Subject {
            id,
            user_id: subject.user_id,
            title: subject.title,
            description: subject.description,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(id, record.clone());
        Ok(record)
    }

    async fn delete_owned(&self, id: i64, user_id: i64) -> Result<Option<Subject>> {
        let mut table = self.inner.write().await;
        match table.rows.get(&id) {
            Some(s) if s.user_id == user_id => Ok(table.rows.remove(&id)),
            _ => Ok(None),
        }
    }
}
