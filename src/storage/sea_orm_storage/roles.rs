//! 角色存储操作

use super::{SeaOrmImportSession, map_write_err};
use crate::entity::roles::{ActiveModel, Column, Entity as Roles};
use crate::errors::{Result, RosterError};
use crate::models::roster::entities::{PersonRole, Role};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};

impl SeaOrmImportSession {
    /// 确保角色存在
    pub async fn ensure_role_impl(&self, role: PersonRole) -> Result<(Role, bool)> {
        let existing = Roles::find()
            .filter(Column::Name.eq(role.as_str()))
            .one(&self.txn)
            .await
            .map_err(|e| RosterError::database_operation(format!("查询角色失败: {e}")))?;

        if let Some(model) = existing {
            return Ok((model.into_role(), false));
        }

        let model = ActiveModel {
            name: Set(role.as_str().to_string()),
            ..Default::default()
        };

        let result = model
            .insert(&self.txn)
            .await
            .map_err(|e| map_write_err("创建角色失败", e))?;

        Ok((result.into_role(), true))
    }
}
