use tracing::info;

use super::{ImportLog, RoleIds, SheetRun, SheetTally, extract_rows, find_class_by_group, push_unique};
use crate::errors::Result;
use crate::importer::reconcile::{Reconciler, StudentData, Upsert};
use crate::importer::rows::StudentRow;
use crate::importer::workbook::Sheet;
use crate::models::roster::entities::{ClassGroup, Person};

/// Estudiantes：学生按分组代码归属班级
pub struct EstudiantesProcessor<'a> {
    reconciler: &'a Reconciler<'a>,
    roles: RoleIds,
}

impl<'a> EstudiantesProcessor<'a> {
    pub fn new(reconciler: &'a Reconciler<'a>, roles: RoleIds) -> Self {
        Self { reconciler, roles }
    }

    /// 返回本次产生的学生列表，顺序即处理顺序
    pub async fn process(
        &self,
        sheet: &Sheet,
        classes: &[ClassGroup],
        log: &mut ImportLog,
    ) -> Result<Option<SheetRun<Person>>> {
        let Some(rows) = extract_rows::<StudentRow>(sheet, log) else {
            return Ok(None);
        };

        let mut tally = SheetTally::default();
        let mut students = Vec::new();

        for (_, row) in rows {
            if find_class_by_group(classes, &row.group_code).is_none() {
                log.warn(format!(
                    "No se encontró clase para el grupo '{}' del estudiante '{}'",
                    row.group_code, row.name
                ));
                continue;
            }

            let student = self
                .reconciler
                .upsert_student(
                    StudentData {
                        name: &row.name,
                        carnet_id: row.carnet_id.as_deref(),
                        email: row.email.as_deref(),
                    },
                    self.roles.student,
                )
                .await?;

            match &student {
                Upsert::Created(_) => {
                    log.stats.users_created += 1;
                    tally.created += 1;
                }
                Upsert::Updated(_) => {
                    log.stats.users_updated += 1;
                    tally.updated += 1;
                }
            }
            tally.rows_processed += 1;

            push_unique(&mut students, student.into_inner(), |p| p.id);
        }

        info!("Estudiantes processed: {} students", students.len());
        Ok(Some(SheetRun {
            records: students,
            tally,
        }))
    }
}
