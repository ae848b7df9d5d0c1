//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assignments;
mod classes;
mod roles;
mod teams;
mod users;

use crate::config::DatabaseConfig;
use crate::errors::{Result, RosterError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectOptions, Database, DatabaseConnection, DatabaseTransaction, DbErr, SqlErr,
    TransactionTrait,
};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

/// 单次导入的事务会话
pub struct SeaOrmImportSession {
    pub(crate) txn: DatabaseTransaction,
}

impl SeaOrmStorage {
    /// 按配置连接数据库并执行迁移
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&config.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| RosterError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        // 内存数据库只存在于单个连接中
        let in_memory = url.contains(":memory:");

        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| RosterError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        if !in_memory {
            opt = opt
                .journal_mode(SqliteJournalMode::Wal)
                .pragma("mmap_size", "536870912")
                .pragma("wal_autocheckpoint", "1000");
        }

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.pool_size)
                .min_connections(1)
                .idle_timeout(Duration::from_secs(300))
        };

        let pool = pool_options
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.timeout))
            .connect_with(opt)
            .await
            .map_err(|e| RosterError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| RosterError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(RosterError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

/// 唯一约束冲突转换为 Conflict，其余为数据库操作错误
pub(crate) fn map_write_err(context: &str, e: DbErr) -> RosterError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            RosterError::conflict(format!("{context}: {detail}"))
        }
        _ => RosterError::database_operation(format!("{context}: {e}")),
    }
}

// Storage trait 实现
use crate::models::roster::{
    entities::{Assignment, ClassGroup, Person, PersonRole, Role, Team},
    requests::{
        CreateAssignmentRequest, CreateClassGroupRequest, CreatePersonRequest, CreateTeamRequest,
        UpdateAssignmentRequest, UpdateClassGroupRequest, UpdatePersonRequest,
    },
};
use crate::storage::{ImportSession, Storage};
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    async fn begin_import(&self) -> Result<Box<dyn ImportSession>> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| RosterError::database_connection(format!("开启事务失败: {e}")))?;

        Ok(Box::new(SeaOrmImportSession { txn }))
    }

    async fn list_persons(&self) -> Result<Vec<Person>> {
        self.list_persons_impl().await
    }

    async fn list_classes(&self) -> Result<Vec<ClassGroup>> {
        self.list_classes_impl().await
    }

    async fn list_assignments_by_class(&self, class_id: i64) -> Result<Vec<Assignment>> {
        self.list_assignments_by_class_impl(class_id).await
    }

    async fn get_team_by_name(&self, name: &str) -> Result<Option<Team>> {
        self.get_team_by_name_impl(name).await
    }

    async fn list_teams_by_class(&self, class_id: i64) -> Result<Vec<Team>> {
        self.list_teams_by_class_impl(class_id).await
    }
}

#[async_trait]
impl ImportSession for SeaOrmImportSession {
    // 角色模块
    async fn ensure_role(&self, role: PersonRole) -> Result<(Role, bool)> {
        self.ensure_role_impl(role).await
    }

    // 人员模块
    async fn find_person_by_name(&self, name: &str) -> Result<Option<Person>> {
        self.find_person_by_name_impl(name).await
    }

    async fn find_person_by_email(&self, email: &str) -> Result<Option<Person>> {
        self.find_person_by_email_impl(email).await
    }

    async fn create_person(&self, req: CreatePersonRequest) -> Result<Person> {
        self.create_person_impl(req).await
    }

    async fn update_person(&self, id: i64, update: UpdatePersonRequest) -> Result<Person> {
        self.update_person_impl(id, update).await
    }

    // 班级模块
    async fn find_class_by_name(&self, name: &str) -> Result<Option<ClassGroup>> {
        self.find_class_by_name_impl(name).await
    }

    async fn create_class(&self, req: CreateClassGroupRequest) -> Result<ClassGroup> {
        self.create_class_impl(req).await
    }

    async fn update_class(&self, id: i64, update: UpdateClassGroupRequest) -> Result<ClassGroup> {
        self.update_class_impl(id, update).await
    }

    // 作业模块
    async fn find_assignment(&self, class_id: i64, title: &str) -> Result<Option<Assignment>> {
        self.find_assignment_impl(class_id, title).await
    }

    async fn create_assignment(&self, req: CreateAssignmentRequest) -> Result<Assignment> {
        self.create_assignment_impl(req).await
    }

    async fn update_assignment(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Assignment> {
        self.update_assignment_impl(id, update).await
    }

    // 团队模块
    async fn create_team(&self, req: CreateTeamRequest) -> Result<Team> {
        self.create_team_impl(req).await
    }

    async fn attach_team_to_class(&self, class_id: i64, team_id: i64) -> Result<()> {
        self.attach_team_to_class_impl(class_id, team_id).await
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.txn
            .commit()
            .await
            .map_err(|e| RosterError::database_operation(format!("提交事务失败: {e}")))
    }
}
