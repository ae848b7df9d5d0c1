//! 班级存储操作

use super::{SeaOrmImportSession, SeaOrmStorage, map_write_err};
use crate::entity::classes::{ActiveModel, Column, Entity as Classes};
use crate::errors::{Result, RosterError};
use crate::models::roster::{
    entities::ClassGroup,
    requests::{CreateClassGroupRequest, UpdateClassGroupRequest},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmImportSession {
    /// 通过组合名称获取班级
    pub async fn find_class_by_name_impl(&self, name: &str) -> Result<Option<ClassGroup>> {
        let result = Classes::find()
            .filter(Column::Name.eq(name))
            .one(&self.txn)
            .await
            .map_err(|e| RosterError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class_group()))
    }

    /// 创建班级
    pub async fn create_class_impl(&self, req: CreateClassGroupRequest) -> Result<ClassGroup> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            description: Set(req.description),
            professor_id: Set(req.professor_id),
            lab_professor_id: Set(req.lab_professor_id),
            semester: Set(req.semester),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.txn)
            .await
            .map_err(|e| map_write_err("创建班级失败", e))?;

        Ok(result.into_class_group())
    }

    /// 更新班级
    pub async fn update_class_impl(
        &self,
        id: i64,
        update: UpdateClassGroupRequest,
    ) -> Result<ClassGroup> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            id: Set(id),
            description: Set(update.description),
            professor_id: Set(update.professor_id),
            lab_professor_id: Set(update.lab_professor_id),
            semester: Set(update.semester),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .update(&self.txn)
            .await
            .map_err(|e| RosterError::database_operation(format!("更新班级失败: {e}")))?;

        Ok(result.into_class_group())
    }
}

impl SeaOrmStorage {
    /// 按创建顺序列出班级
    pub async fn list_classes_impl(&self) -> Result<Vec<ClassGroup>> {
        let result = Classes::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| RosterError::database_operation(format!("查询班级列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_class_group()).collect())
    }
}
