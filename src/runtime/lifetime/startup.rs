use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::roster::entities::PersonRole;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
}

/// 预先创建导入所需的角色
/// 导入时也会确保角色存在，这里只是让空库启动后即可查询到角色
async fn seed_roles(storage: &Arc<dyn Storage>) -> Result<()> {
    let session = storage.begin_import().await?;
    for role in PersonRole::all_roles() {
        let (role, created) = session.ensure_role(*role).await?;
        if created {
            info!("Role {} created (ID: {})", role.name, role.id);
        } else {
            debug!("Role {} already exists", role.name);
        }
    }
    session.commit().await
}

/// 准备服务器启动的上下文
pub async fn prepare_server_startup() -> StartupContext {
    let config = AppConfig::get();

    let storage = crate::storage::create_storage(&config.database)
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    if let Err(e) = seed_roles(&storage).await {
        warn!("Failed to seed roles: {}, they will be created on first import", e);
    }

    StartupContext { storage }
}
