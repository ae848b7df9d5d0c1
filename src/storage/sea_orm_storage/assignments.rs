//! 作业存储操作

use super::{SeaOrmImportSession, SeaOrmStorage, map_write_err};
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::errors::{Result, RosterError};
use crate::models::roster::{
    entities::Assignment,
    requests::{CreateAssignmentRequest, UpdateAssignmentRequest},
};
use chrono::NaiveDateTime;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

// 作业时间按墙钟时间存储
fn to_timestamp(value: Option<NaiveDateTime>) -> Option<i64> {
    value.map(|v| v.and_utc().timestamp())
}

impl SeaOrmImportSession {
    /// 通过 (班级, 标题) 获取作业
    pub async fn find_assignment_impl(
        &self,
        class_id: i64,
        title: &str,
    ) -> Result<Option<Assignment>> {
        let result = Assignments::find()
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Title.eq(title))
            .one(&self.txn)
            .await
            .map_err(|e| RosterError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 创建作业
    pub async fn create_assignment_impl(
        &self,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            class_id: Set(req.class_id),
            title: Set(req.title),
            description: Set(req.description),
            start_date: Set(to_timestamp(req.start_date)),
            due_date: Set(to_timestamp(req.due_date)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.txn)
            .await
            .map_err(|e| map_write_err("创建作业失败", e))?;

        Ok(result.into_assignment())
    }

    /// 更新作业
    pub async fn update_assignment_impl(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            id: Set(id),
            description: Set(update.description),
            start_date: Set(to_timestamp(update.start_date)),
            due_date: Set(to_timestamp(update.due_date)),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .update(&self.txn)
            .await
            .map_err(|e| RosterError::database_operation(format!("更新作业失败: {e}")))?;

        Ok(result.into_assignment())
    }
}

impl SeaOrmStorage {
    /// 列出班级的作业
    pub async fn list_assignments_by_class_impl(&self, class_id: i64) -> Result<Vec<Assignment>> {
        let result = Assignments::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| RosterError::database_operation(format!("查询作业列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_assignment()).collect())
    }
}
