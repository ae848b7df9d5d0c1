use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 人员角色
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "roster.ts")]
pub enum PersonRole {
    Profesor,   // 教师
    Estudiante, // 学生
}

impl PersonRole {
    pub const PROFESOR: &'static str = "PROFESOR";
    pub const ESTUDIANTE: &'static str = "ESTUDIANTE";

    /// 导入前必须存在的角色
    pub fn all_roles() -> &'static [PersonRole] {
        &[PersonRole::Profesor, PersonRole::Estudiante]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PersonRole::Profesor => Self::PROFESOR,
            PersonRole::Estudiante => Self::ESTUDIANTE,
        }
    }
}

impl<'de> Deserialize<'de> for PersonRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for PersonRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PersonRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            PersonRole::PROFESOR => Ok(PersonRole::Profesor),
            PersonRole::ESTUDIANTE => Ok(PersonRole::Estudiante),
            _ => Err(format!("Invalid person role: {s}")),
        }
    }
}

// 角色记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "roster.ts")]
pub struct Role {
    pub id: i64,
    pub name: String,
}

// 人员（教师或学生）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "roster.ts")]
pub struct Person {
    pub id: i64,
    pub carnet_id: Option<String>,
    pub name: String,
    pub email: Option<String>,
    pub role_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// 班级（分组-课程-学期）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "roster.ts")]
pub struct ClassGroup {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub professor_id: i64,
    pub lab_professor_id: Option<i64>,
    pub semester: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClassGroup {
    /// 名称首字符作为分组代码
    pub fn group_code(&self) -> Option<char> {
        self.name.trim().chars().next()
    }
}

// 作业
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "roster.ts")]
pub struct Assignment {
    pub id: i64,
    pub class_id: i64,
    pub title: String,
    pub description: String,
    pub start_date: Option<NaiveDateTime>,
    pub due_date: Option<NaiveDateTime>,
    pub created_at: DateTime<Utc>,
}

// 团队
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "roster.ts")]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub member_ids: Vec<i64>,
    pub created_at: DateTime<Utc>,
}
