use sqlx::MySqlPool;
use std::sync::Arc;

// 声明子模块
pub mod db;
pub mod memory;
pub mod repository;
pub mod store;

pub use store::{SubjectStore, UserStore};

/// 存储容器，clone 只复制 Arc
#[derive(Clone)]
pub struct Storage {
    pub users: Arc<dyn UserStore>,
    pub subjects: Arc<dyn SubjectStore>,
}

impl Storage {
    pub fn new(users: Arc<dyn UserStore>, subjects: Arc<dyn SubjectStore>) -> Self {
        Self { users, subjects }
    }

    /// MySQL 版本，共用同一个连接池
    pub fn mysql(pool: MySqlPool) -> Self {
        Self::new(
            Arc::new(repository::UserRepository::new(pool.clone())),
            Arc::new(repository::SubjectRepository::new(pool)),
        )
    }

    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(memory::MemoryUserStore::default()),
            Arc::new(memory::MemorySubjectStore::default()),
        )
    }
}
