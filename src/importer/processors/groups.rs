use tracing::{debug, info};

use super::{ImportLog, RoleIds, SheetRun, SheetTally, extract_rows, push_unique};
use crate::errors::Result;
use crate::importer::reconcile::{ClassData, Reconciler, Upsert};
use crate::importer::rows::GroupRow;
use crate::importer::workbook::Sheet;
use crate::models::roster::entities::{ClassGroup, Person};

/// Grupos：教师与班级
pub struct GroupsProcessor<'a> {
    reconciler: &'a Reconciler<'a>,
    roles: RoleIds,
}

impl<'a> GroupsProcessor<'a> {
    pub fn new(reconciler: &'a Reconciler<'a>, roles: RoleIds) -> Self {
        Self { reconciler, roles }
    }

    /// 返回本次产生的班级列表，表头无效时返回 `None`
    pub async fn process(
        &self,
        sheet: &Sheet,
        log: &mut ImportLog,
    ) -> Result<Option<SheetRun<ClassGroup>>> {
        let Some(rows) = extract_rows::<GroupRow>(sheet, log) else {
            return Ok(None);
        };

        let mut tally = SheetTally::default();
        let mut classes = Vec::new();

        for (row_number, row) in rows {
            let class_name = row.class_name();
            debug!("Processing class {} (row {})", class_name, row_number);

            let professor = self.professor(&row.professor, log, &mut tally).await?;
            let lab_professor = match &row.lab_professor {
                Some(name) => Some(self.professor(name, log, &mut tally).await?),
                None => None,
            };

            let class = self
                .reconciler
                .upsert_class(ClassData {
                    description: row.class_description(),
                    name: class_name,
                    professor_id: professor.id,
                    lab_professor_id: lab_professor.map(|p| p.id),
                    semester: row.semester.clone(),
                })
                .await?;

            match &class {
                Upsert::Created(_) => {
                    log.stats.classes_created += 1;
                    tally.created += 1;
                }
                Upsert::Updated(_) => {
                    log.stats.classes_updated += 1;
                    tally.updated += 1;
                }
            }
            tally.rows_processed += 1;

            push_unique(&mut classes, class.into_inner(), |c| c.id);
        }

        info!("Grupos processed: {} classes", classes.len());
        Ok(Some(SheetRun {
            records: classes,
            tally,
        }))
    }

    /// 已存在的教师计为更新
    async fn professor(
        &self,
        name: &str,
        log: &mut ImportLog,
        tally: &mut SheetTally,
    ) -> Result<Person> {
        let professor = self
            .reconciler
            .upsert_professor(name, self.roles.professor)
            .await?;
        if professor.is_created() {
            log.stats.users_created += 1;
            tally.created += 1;
        } else {
            log.stats.users_updated += 1;
            tally.updated += 1;
        }
        Ok(professor.into_inner())
    }
}
