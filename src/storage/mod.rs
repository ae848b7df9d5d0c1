use std::sync::Arc;

use crate::config::DatabaseConfig;
use crate::models::roster::{
    entities::{Assignment, ClassGroup, Person, PersonRole, Role, Team},
    requests::{
        CreateAssignmentRequest, CreateClassGroupRequest, CreatePersonRequest, CreateTeamRequest,
        UpdateAssignmentRequest, UpdateClassGroupRequest, UpdatePersonRequest,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 开启一次导入会话（单个事务）
    async fn begin_import(&self) -> Result<Box<dyn ImportSession>>;

    /// 名册查询方法
    // 按 ID 顺序列出全部人员
    async fn list_persons(&self) -> Result<Vec<Person>>;
    // 按 ID 顺序列出全部班级
    async fn list_classes(&self) -> Result<Vec<ClassGroup>>;
    // 列出班级的作业
    async fn list_assignments_by_class(&self, class_id: i64) -> Result<Vec<Assignment>>;
    // 通过名称获取团队（含成员）
    async fn get_team_by_name(&self, name: &str) -> Result<Option<Team>>;
    // 列出挂在班级下的团队
    async fn list_teams_by_class(&self, class_id: i64) -> Result<Vec<Team>>;
}

/// 导入会话
///
/// 所有写操作都在同一事务内进行，后续工作表可以读到前面工作表刚写入的数据。
/// 会话在 `commit` 之前被丢弃即回滚。
#[async_trait::async_trait]
pub trait ImportSession: Send + Sync {
    /// 角色
    // 确保角色存在，返回 (角色, 是否新建)
    async fn ensure_role(&self, role: PersonRole) -> Result<(Role, bool)>;

    /// 人员
    async fn find_person_by_name(&self, name: &str) -> Result<Option<Person>>;
    async fn find_person_by_email(&self, email: &str) -> Result<Option<Person>>;
    async fn create_person(&self, req: CreatePersonRequest) -> Result<Person>;
    async fn update_person(&self, id: i64, update: UpdatePersonRequest) -> Result<Person>;

    /// 班级
    async fn find_class_by_name(&self, name: &str) -> Result<Option<ClassGroup>>;
    async fn create_class(&self, req: CreateClassGroupRequest) -> Result<ClassGroup>;
    async fn update_class(&self, id: i64, update: UpdateClassGroupRequest) -> Result<ClassGroup>;

    /// 作业
    async fn find_assignment(&self, class_id: i64, title: &str) -> Result<Option<Assignment>>;
    async fn create_assignment(&self, req: CreateAssignmentRequest) -> Result<Assignment>;
    async fn update_assignment(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Assignment>;

    /// 团队
    // 名称重复时返回 Conflict
    async fn create_team(&self, req: CreateTeamRequest) -> Result<Team>;
    async fn attach_team_to_class(&self, class_id: i64, team_id: i64) -> Result<()>;

    /// 提交事务
    async fn commit(self: Box<Self>) -> Result<()>;
}

pub async fn create_storage(config: &DatabaseConfig) -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::connect(config).await?;
    Ok(Arc::new(storage))
}
