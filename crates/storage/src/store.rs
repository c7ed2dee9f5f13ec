use anyhow::Result;
use async_trait::async_trait;
use study_core::{NewSubject, NewUser, Subject, User};

/// 用户存储接口
///
/// 任何实现该接口的结构体 (MySQL、内存) 都可以注入到 Web 服务中。
#[async_trait]
pub trait UserStore: Send + Sync {
    /// 创建用户，返回带主键和时间戳的完整记录
    async fn create(&self, user: NewUser) -> Result<User>;

    /// 按邮箱查找 (调用方负责先做 `normalize_email`)
    ///
    /// * `Ok(None)` - 未找到记录 (不是错误)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>>;

    /// 更新姓名和邮箱，用户不存在时返回 `Ok(None)`
    async fn update_profile(&self, id: i64, name: &str, email: &str) -> Result<Option<User>>;
}

/// 学科存储接口，所有读写都限定在所属用户范围内
#[async_trait]
pub trait SubjectStore: Send + Sync {
    /// 某用户的全部学科，最新创建的在前
    async fn list_by_owner(&self, user_id: i64) -> Result<Vec<Subject>>;

    async fn create(&self, subject: NewSubject) -> Result<Subject>;

    /// 删除属于 `user_id` 的学科
    ///
    /// # 返回
    /// * `Ok(Some(subject))` - 已删除
    /// * `Ok(None)` - 不存在，或者属于别的用户
    async fn delete_owned(&self, id: i64, user_id: i64) -> Result<Option<Subject>>;
}
