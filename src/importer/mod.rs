//! 名册导入流水线
//!
//! 一个工作簿依次处理四张表：Grupos → Entregas → Estudiantes → Equipos。
//! 后面的表依赖前面的表在同一次导入中产生的班级和学生。

pub mod date_parser;
pub mod matcher;
pub mod orchestrator;
pub mod processors;
pub mod reconcile;
pub mod rows;
pub mod validator;
pub mod workbook;

#[cfg(test)]
mod tests;

pub use date_parser::{DateParseError, DateParser};
pub use matcher::{MemberMatch, TeamMemberMatcher};
pub use orchestrator::{ImportOrchestrator, ImportPhase};
pub use workbook::{CellValue, Sheet, Workbook, WorkbookLoader};

use crate::config::ImportConfig;

/// 导入选项，由服务层根据配置生成
#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub max_file_size: usize,
    pub allowed_extensions: Vec<String>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            max_file_size: 10 * 1024 * 1024,
            allowed_extensions: vec![".xlsx".to_string(), ".xls".to_string()],
        }
    }
}

impl From<&ImportConfig> for ImportOptions {
    fn from(config: &ImportConfig) -> Self {
        Self {
            max_file_size: config.max_file_size,
            allowed_extensions: config
                .allowed_extensions
                .iter()
                .map(|e| e.to_lowercase())
                .collect(),
        }
    }
}
