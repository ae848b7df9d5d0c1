//! 团队存储操作

use super::{SeaOrmImportSession, SeaOrmStorage, map_write_err};
use crate::entity::class_teams::{
    ActiveModel as ClassTeamActiveModel, Column as ClassTeamColumn, Entity as ClassTeams,
};
use crate::entity::team_users::{
    ActiveModel as TeamUserActiveModel, Column as TeamUserColumn, Entity as TeamUsers,
};
use crate::entity::teams::{ActiveModel, Column, Entity as Teams, Model as TeamModel};
use crate::errors::{Result, RosterError};
use crate::models::roster::{entities::Team, requests::CreateTeamRequest};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

/// 读取团队成员 ID（按加入顺序）
async fn load_member_ids<C: ConnectionTrait>(conn: &C, team_id: i64) -> Result<Vec<i64>> {
    let rows = TeamUsers::find()
        .filter(TeamUserColumn::TeamId.eq(team_id))
        .order_by_asc(TeamUserColumn::Id)
        .all(conn)
        .await
        .map_err(|e| RosterError::database_operation(format!("查询团队成员失败: {e}")))?;

    Ok(rows.into_iter().map(|r| r.user_id).collect())
}

async fn with_members<C: ConnectionTrait>(conn: &C, model: TeamModel) -> Result<Team> {
    let member_ids = load_member_ids(conn, model.id).await?;
    Ok(model.into_team(member_ids))
}

impl SeaOrmImportSession {
    /// 创建团队及其成员关系
    pub async fn create_team_impl(&self, req: CreateTeamRequest) -> Result<Team> {
        let existing = Teams::find()
            .filter(Column::Name.eq(&req.name))
            .one(&self.txn)
            .await
            .map_err(|e| RosterError::database_operation(format!("查询团队失败: {e}")))?;

        if existing.is_some() {
            return Err(RosterError::conflict(format!("团队名称已存在: {}", req.name)));
        }

        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            created_at: Set(now),
            ..Default::default()
        };

        let team = model
            .insert(&self.txn)
            .await
            .map_err(|e| map_write_err("创建团队失败", e))?;

        for user_id in &req.member_ids {
            TeamUserActiveModel {
                team_id: Set(team.id),
                user_id: Set(*user_id),
                ..Default::default()
            }
            .insert(&self.txn)
            .await
            .map_err(|e| map_write_err("添加团队成员失败", e))?;
        }

        Ok(team.into_team(req.member_ids))
    }

    /// 将团队挂到班级下（已存在时不重复添加）
    pub async fn attach_team_to_class_impl(&self, class_id: i64, team_id: i64) -> Result<()> {
        let existing = ClassTeams::find()
            .filter(ClassTeamColumn::ClassId.eq(class_id))
            .filter(ClassTeamColumn::TeamId.eq(team_id))
            .one(&self.txn)
            .await
            .map_err(|e| RosterError::database_operation(format!("查询班级团队失败: {e}")))?;

        if existing.is_some() {
            return Ok(());
        }

        ClassTeamActiveModel {
            class_id: Set(class_id),
            team_id: Set(team_id),
            ..Default::default()
        }
        .insert(&self.txn)
        .await
        .map_err(|e| map_write_err("关联班级团队失败", e))?;

        Ok(())
    }
}

impl SeaOrmStorage {
    /// 通过名称获取团队
    pub async fn get_team_by_name_impl(&self, name: &str) -> Result<Option<Team>> {
        let result = Teams::find()
            .filter(Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(|e| RosterError::database_operation(format!("查询团队失败: {e}")))?;

        match result {
            Some(model) => Ok(Some(with_members(&self.db, model).await?)),
            None => Ok(None),
        }
    }

    /// 列出班级下的团队
    pub async fn list_teams_by_class_impl(&self, class_id: i64) -> Result<Vec<Team>> {
        let links = ClassTeams::find()
            .filter(ClassTeamColumn::ClassId.eq(class_id))
            .order_by_asc(ClassTeamColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| RosterError::database_operation(format!("查询班级团队失败: {e}")))?;

        let mut teams = Vec::with_capacity(links.len());
        for link in links {
            let model = Teams::find_by_id(link.team_id)
                .one(&self.db)
                .await
                .map_err(|e| RosterError::database_operation(format!("查询团队失败: {e}")))?;
            if let Some(model) = model {
                teams.push(with_members(&self.db, model).await?);
            }
        }

        Ok(teams)
    }
}
