//! 团队实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "teams")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::team_users::Entity")]
    TeamUsers,
    #[sea_orm(has_many = "super::class_teams::Entity")]
    ClassTeams,
}

impl Related<super::team_users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeamUsers.def()
    }
}

impl Related<super::class_teams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassTeams.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 成员 ID 由调用方单独查询后传入
    pub fn into_team(self, member_ids: Vec<i64>) -> crate::models::roster::entities::Team {
        use crate::models::roster::entities::Team;
        use chrono::{DateTime, Utc};

        Team {
            id: self.id,
            name: self.name,
            member_ids,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        }
    }
}
