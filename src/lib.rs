//! Roster Import - 学期名册与作业计划导入服务
//!
//! 从一个包含 Grupos、Entregas、Estudiantes、Equipos 四张表的工作簿中
//! 批量导入教师、班级、作业、学生和团队。
//!
//! # 架构
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `importer`: 工作簿导入流水线
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod config;
pub mod entity;
pub mod errors;
pub mod importer;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
