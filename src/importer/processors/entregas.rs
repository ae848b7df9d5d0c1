use chrono::{NaiveDateTime, TimeDelta};
use tracing::{debug, info};

use super::{ImportLog, SheetRun, SheetTally, extract_rows};
use crate::errors::Result;
use crate::importer::date_parser::DateParser;
use crate::importer::reconcile::{AssignmentData, Reconciler, Upsert};
use crate::importer::rows::EntregaRow;
use crate::importer::workbook::Sheet;
use crate::models::roster::entities::{Assignment, ClassGroup};

/// Entregas：每一行为每个班级生成一个作业
pub struct EntregasProcessor<'a> {
    reconciler: &'a Reconciler<'a>,
}

/// 截止日 23:59，开始日为提前 7 天的 00:00
pub(crate) fn assignment_window(
    date: chrono::NaiveDate,
) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let due = date.and_hms_opt(23, 59, 0)?;
    let start = date
        .checked_sub_signed(TimeDelta::try_days(7)?)?
        .and_hms_opt(0, 0, 0)?;
    Some((start, due))
}

impl<'a> EntregasProcessor<'a> {
    pub fn new(reconciler: &'a Reconciler<'a>) -> Self {
        Self { reconciler }
    }

    pub async fn process(
        &self,
        sheet: &Sheet,
        classes: &[ClassGroup],
        log: &mut ImportLog,
    ) -> Result<Option<SheetRun<Assignment>>> {
        let Some(rows) = extract_rows::<EntregaRow>(sheet, log) else {
            return Ok(None);
        };

        let mut tally = SheetTally::default();
        let mut assignments = Vec::new();

        for (row_number, row) in rows {
            let window = self.parse_window(&row, row_number, log);

            for class in classes {
                let title = row.assignment_title(class.id);
                let description = if row.delivery.is_empty() {
                    title.clone()
                } else {
                    format!("{} - {}", title, row.delivery)
                };

                let assignment = self
                    .reconciler
                    .upsert_assignment(AssignmentData {
                        class_id: class.id,
                        title,
                        description,
                        start_date: window.map(|(start, _)| start),
                        due_date: window.map(|(_, due)| due),
                    })
                    .await?;

                match &assignment {
                    Upsert::Created(_) => {
                        log.stats.assignments_created += 1;
                        tally.created += 1;
                    }
                    Upsert::Updated(_) => {
                        log.stats.assignments_updated += 1;
                        tally.updated += 1;
                    }
                }
                assignments.push(assignment.into_inner());
            }
            tally.rows_processed += 1;
        }

        info!("Entregas processed: {} assignments", assignments.len());
        Ok(Some(SheetRun {
            records: assignments,
            tally,
        }))
    }

    /// 日期无法解析时仍然创建作业，只记录警告
    fn parse_window(
        &self,
        row: &EntregaRow,
        row_number: usize,
        log: &mut ImportLog,
    ) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let Some(raw) = row.date.as_deref() else {
            debug!("Row {}: no date for delivery '{}'", row_number, row.work);
            return None;
        };

        match DateParser::parse(raw) {
            Ok(date) => assignment_window(date),
            Err(e) => {
                log.warn(format!(
                    "Formato de fecha inválido '{}' para entrega '{}' (fila {}): {}",
                    raw, row.work, row_number, e
                ));
                None
            }
        }
    }
}
