//! 人员存储操作

use super::{SeaOrmImportSession, SeaOrmStorage, map_write_err};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{Result, RosterError};
use crate::models::roster::{
    entities::Person,
    requests::{CreatePersonRequest, UpdatePersonRequest},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmImportSession {
    /// 通过姓名精确查找人员（同名时取最早创建的）
    pub async fn find_person_by_name_impl(&self, name: &str) -> Result<Option<Person>> {
        let result = Users::find()
            .filter(Column::Name.eq(name))
            .order_by_asc(Column::Id)
            .one(&self.txn)
            .await
            .map_err(|e| RosterError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_person()))
    }

    /// 通过邮箱查找人员
    pub async fn find_person_by_email_impl(&self, email: &str) -> Result<Option<Person>> {
        let result = Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.txn)
            .await
            .map_err(|e| RosterError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_person()))
    }

    /// 创建人员
    pub async fn create_person_impl(&self, req: CreatePersonRequest) -> Result<Person> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            carnet_id: Set(req.carnet_id),
            name: Set(req.name),
            email: Set(req.email),
            role_id: Set(req.role_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.txn)
            .await
            .map_err(|e| map_write_err("创建用户失败", e))?;

        Ok(result.into_person())
    }

    /// 更新人员
    pub async fn update_person_impl(&self, id: i64, update: UpdatePersonRequest) -> Result<Person> {
        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(carnet_id) = update.carnet_id {
            model.carnet_id = Set(Some(carnet_id));
        }

        if let Some(email) = update.email {
            model.email = Set(Some(email));
        }

        if let Some(role_id) = update.role_id {
            model.role_id = Set(role_id);
        }

        let result = model
            .update(&self.txn)
            .await
            .map_err(|e| map_write_err("更新用户失败", e))?;

        Ok(result.into_person())
    }
}

impl SeaOrmStorage {
    /// 按创建顺序列出人员
    pub async fn list_persons_impl(&self) -> Result<Vec<Person>> {
        let result = Users::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| RosterError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_person()).collect())
    }
}
