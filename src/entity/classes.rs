//! 班级实体（课程-分组-学期）

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "classes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub name: String,
    pub description: Option<String>,
    pub professor_id: i64,
    pub lab_professor_id: Option<i64>,
    pub semester: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ProfessorId",
        to = "super::users::Column::Id"
    )]
    Professor,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::LabProfessorId",
        to = "super::users::Column::Id"
    )]
    LabProfessor,
    #[sea_orm(has_many = "super::assignments::Entity")]
    Assignments,
    #[sea_orm(has_many = "super::class_teams::Entity")]
    ClassTeams,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignments.def()
    }
}

impl Related<super::class_teams::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ClassTeams.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_class_group(self) -> crate::models::roster::entities::ClassGroup {
        use crate::models::roster::entities::ClassGroup;
        use chrono::{DateTime, Utc};

        ClassGroup {
            id: self.id,
            name: self.name,
            description: self.description,
            professor_id: self.professor_id,
            lab_professor_id: self.lab_professor_id,
            semester: self.semester,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        }
    }
}
