//! 各工作表的处理器
//!
//! 处理器之间通过显式的返回值传递依赖：Grupos 产出班级列表，
//! Estudiantes 产出学生列表，Equipos 同时消费两者。

mod entregas;
mod equipos;
mod estudiantes;
mod groups;

pub use entregas::EntregasProcessor;
pub use equipos::EquiposProcessor;
pub use estudiantes::EstudiantesProcessor;
pub use groups::GroupsProcessor;

use tracing::warn;

use super::rows::{RowOutcome, SheetRow};
use super::validator::SheetValidator;
use super::workbook::Sheet;
use crate::models::imports::responses::ImportStats;
use crate::models::roster::entities::ClassGroup;

/// 本次导入使用的角色 ID
#[derive(Debug, Clone, Copy)]
pub struct RoleIds {
    pub professor: i64,
    pub student: i64,
}

/// 导入过程中累积的统计和警告
#[derive(Debug, Default)]
pub struct ImportLog {
    pub stats: ImportStats,
    pub warnings: Vec<String>,
}

impl ImportLog {
    /// 记录一条警告（同时写入日志）
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        self.warnings.push(message);
    }
}

/// 单表计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SheetTally {
    pub rows_processed: u32,
    pub created: u32,
    pub updated: u32,
}

/// 单表处理结果，`records` 供后续工作表使用
#[derive(Debug)]
pub struct SheetRun<T> {
    pub records: Vec<T>,
    pub tally: SheetTally,
}

/// 校验表头并提取全部完整的数据行
///
/// 表头不匹配时返回 `None`，整张表跳过。
pub(crate) fn extract_rows<R: SheetRow>(
    sheet: &Sheet,
    log: &mut ImportLog,
) -> Option<Vec<(usize, R)>> {
    let schema = R::SCHEMA;
    let mismatches = SheetValidator::validate(sheet, &schema.headers());
    if !mismatches.is_empty() {
        for mismatch in mismatches {
            log.warn(format!("Hoja '{}': {}", schema.name, mismatch));
        }
        return None;
    }

    let mut records = Vec::new();
    for (row_number, cells) in sheet.data_rows() {
        match R::extract(cells) {
            RowOutcome::Record(record) => records.push((row_number, record)),
            RowOutcome::Blank => {}
            RowOutcome::Incomplete(missing) => log.warn(format!(
                "Fila {} de '{}': Campos obligatorios vacíos ({}), saltando",
                row_number,
                schema.name,
                missing.join(", ")
            )),
        }
    }
    Some(records)
}

/// 按分组代码找到所属班级：代码必须恰好是一个字符，并等于班级名称的首字符
pub(crate) fn find_class_by_group<'c>(
    classes: &'c [ClassGroup],
    group_code: &str,
) -> Option<&'c ClassGroup> {
    let mut chars = group_code.chars();
    let (Some(code), None) = (chars.next(), chars.next()) else {
        return None;
    };
    classes.iter().find(|c| c.group_code() == Some(code))
}

/// 按 ID 去重并保持首次出现的顺序
pub(crate) fn push_unique<T>(items: &mut Vec<T>, item: T, id: impl Fn(&T) -> i64) {
    let key = id(&item);
    if !items.iter().any(|existing| id(existing) == key) {
        items.push(item);
    }
}
