use chrono::NaiveDateTime;

// 人员创建请求
#[derive(Debug, Clone)]
pub struct CreatePersonRequest {
    pub carnet_id: Option<String>,
    pub name: String,
    pub email: Option<String>,
    pub role_id: i64,
}

// 人员更新请求，None 表示保持原值
#[derive(Debug, Clone, Default)]
pub struct UpdatePersonRequest {
    pub carnet_id: Option<String>,
    pub email: Option<String>,
    pub role_id: Option<i64>,
}

// 班级创建请求
#[derive(Debug, Clone)]
pub struct CreateClassGroupRequest {
    pub name: String,
    pub description: Option<String>,
    pub professor_id: i64,
    pub lab_professor_id: Option<i64>,
    pub semester: String,
}

// 班级更新请求（教师、实验教师、学期、描述整体替换）
#[derive(Debug, Clone)]
pub struct UpdateClassGroupRequest {
    pub description: Option<String>,
    pub professor_id: i64,
    pub lab_professor_id: Option<i64>,
    pub semester: String,
}

// 作业创建请求
#[derive(Debug, Clone)]
pub struct CreateAssignmentRequest {
    pub class_id: i64,
    pub title: String,
    pub description: String,
    pub start_date: Option<NaiveDateTime>,
    pub due_date: Option<NaiveDateTime>,
}

// 作业更新请求
#[derive(Debug, Clone)]
pub struct UpdateAssignmentRequest {
    pub description: String,
    pub start_date: Option<NaiveDateTime>,
    pub due_date: Option<NaiveDateTime>,
}

// 团队创建请求
#[derive(Debug, Clone)]
pub struct CreateTeamRequest {
    pub name: String,
    pub member_ids: Vec<i64>,
}
