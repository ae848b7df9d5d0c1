//! 按业务键新建或更新实体

use tracing::debug;

use crate::errors::Result;
use crate::models::roster::{
    entities::{Assignment, ClassGroup, Person, Team},
    requests::{
        CreateAssignmentRequest, CreateClassGroupRequest, CreatePersonRequest, CreateTeamRequest,
        UpdateAssignmentRequest, UpdateClassGroupRequest, UpdatePersonRequest,
    },
};
use crate::storage::ImportSession;

/// 新建或更新的结果
#[derive(Debug, Clone, PartialEq)]
pub enum Upsert<T> {
    Created(T),
    Updated(T),
}

impl<T> Upsert<T> {
    pub fn is_created(&self) -> bool {
        matches!(self, Upsert::Created(_))
    }

    pub fn value(&self) -> &T {
        match self {
            Upsert::Created(v) | Upsert::Updated(v) => v,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Upsert::Created(v) | Upsert::Updated(v) => v,
        }
    }
}

/// 学生数据
pub struct StudentData<'a> {
    pub name: &'a str,
    pub carnet_id: Option<&'a str>,
    pub email: Option<&'a str>,
}

/// 班级数据
pub struct ClassData {
    pub name: String,
    pub description: String,
    pub professor_id: i64,
    pub lab_professor_id: Option<i64>,
    pub semester: String,
}

/// 作业数据
pub struct AssignmentData {
    pub class_id: i64,
    pub title: String,
    pub description: String,
    pub start_date: Option<chrono::NaiveDateTime>,
    pub due_date: Option<chrono::NaiveDateTime>,
}

pub struct Reconciler<'a> {
    session: &'a dyn ImportSession,
}

impl<'a> Reconciler<'a> {
    pub fn new(session: &'a dyn ImportSession) -> Self {
        Self { session }
    }

    /// 教师按姓名匹配，已存在时不做修改
    pub async fn upsert_professor(&self, name: &str, role_id: i64) -> Result<Upsert<Person>> {
        if let Some(existing) = self.session.find_person_by_name(name).await? {
            return Ok(Upsert::Updated(existing));
        }

        let created = self
            .session
            .create_person(CreatePersonRequest {
                carnet_id: None,
                name: name.to_string(),
                email: None,
                role_id,
            })
            .await?;
        debug!("Created professor {} ({})", created.name, created.id);
        Ok(Upsert::Created(created))
    }

    /// 学生有邮箱时按邮箱匹配，否则按姓名
    pub async fn upsert_student(
        &self,
        data: StudentData<'_>,
        role_id: i64,
    ) -> Result<Upsert<Person>> {
        let existing = match data.email {
            Some(email) => self.session.find_person_by_email(email).await?,
            None => self.session.find_person_by_name(data.name).await?,
        };

        match existing {
            Some(person) => {
                let updated = self
                    .session
                    .update_person(
                        person.id,
                        UpdatePersonRequest {
                            carnet_id: data.carnet_id.map(str::to_string),
                            email: data.email.map(str::to_string),
                            role_id: Some(role_id),
                        },
                    )
                    .await?;
                Ok(Upsert::Updated(updated))
            }
            None => {
                let created = self
                    .session
                    .create_person(CreatePersonRequest {
                        carnet_id: data.carnet_id.map(str::to_string),
                        name: data.name.to_string(),
                        email: data.email.map(str::to_string),
                        role_id,
                    })
                    .await?;
                debug!("Created student {} ({})", created.name, created.id);
                Ok(Upsert::Created(created))
            }
        }
    }

    pub async fn upsert_class(&self, data: ClassData) -> Result<Upsert<ClassGroup>> {
        match self.session.find_class_by_name(&data.name).await? {
            Some(existing) => {
                let updated = self
                    .session
                    .update_class(
                        existing.id,
                        UpdateClassGroupRequest {
                            description: Some(data.description),
                            professor_id: data.professor_id,
                            lab_professor_id: data.lab_professor_id,
                            semester: data.semester,
                        },
                    )
                    .await?;
                Ok(Upsert::Updated(updated))
            }
            None => {
                let created = self
                    .session
                    .create_class(CreateClassGroupRequest {
                        name: data.name,
                        description: Some(data.description),
                        professor_id: data.professor_id,
                        lab_professor_id: data.lab_professor_id,
                        semester: data.semester,
                    })
                    .await?;
                debug!("Created class {} ({})", created.name, created.id);
                Ok(Upsert::Created(created))
            }
        }
    }

    /// 作业按 (班级, 标题) 匹配
    pub async fn upsert_assignment(&self, data: AssignmentData) -> Result<Upsert<Assignment>> {
        match self
            .session
            .find_assignment(data.class_id, &data.title)
            .await?
        {
            Some(existing) => {
                let updated = self
                    .session
                    .update_assignment(
                        existing.id,
                        UpdateAssignmentRequest {
                            description: data.description,
                            start_date: data.start_date,
                            due_date: data.due_date,
                        },
                    )
                    .await?;
                Ok(Upsert::Updated(updated))
            }
            None => {
                let created = self
                    .session
                    .create_assignment(CreateAssignmentRequest {
                        class_id: data.class_id,
                        title: data.title,
                        description: data.description,
                        start_date: data.start_date,
                        due_date: data.due_date,
                    })
                    .await?;
                Ok(Upsert::Created(created))
            }
        }
    }

    /// 团队只新建，名称重复时由存储层返回 Conflict
    pub async fn create_team(&self, name: String, member_ids: Vec<i64>) -> Result<Team> {
        self.session
            .create_team(CreateTeamRequest { name, member_ids })
            .await
    }

    pub async fn attach_team(&self, class_id: i64, team_id: i64) -> Result<()> {
        self.session.attach_team_to_class(class_id, team_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_accessors() {
        let created = Upsert::Created(1);
        let updated = Upsert::Updated(2);
        assert!(created.is_created());
        assert!(!updated.is_created());
        assert_eq!(*updated.value(), 2);
        assert_eq!(created.into_inner(), 1);
    }
}
