use tracing::{debug, info};

use super::{ImportLog, SheetRun, SheetTally, extract_rows, find_class_by_group};
use crate::errors::{Result, RosterError};
use crate::importer::matcher::TeamMemberMatcher;
use crate::importer::reconcile::Reconciler;
use crate::importer::rows::TeamRow;
use crate::importer::workbook::Sheet;
use crate::models::roster::entities::{ClassGroup, Person, Team};

/// Equipos：由姓氏片段组成团队并挂到班级下
pub struct EquiposProcessor<'a> {
    reconciler: &'a Reconciler<'a>,
}

impl<'a> EquiposProcessor<'a> {
    pub fn new(reconciler: &'a Reconciler<'a>) -> Self {
        Self { reconciler }
    }

    pub async fn process(
        &self,
        sheet: &Sheet,
        classes: &[ClassGroup],
        students: &[Person],
        log: &mut ImportLog,
    ) -> Result<Option<SheetRun<Team>>> {
        let Some(rows) = extract_rows::<TeamRow>(sheet, log) else {
            return Ok(None);
        };

        let matcher = TeamMemberMatcher::new(students);
        let mut tally = SheetTally::default();
        let mut teams = Vec::new();

        for (row_number, row) in rows {
            let Some(class) = find_class_by_group(classes, &row.group_code) else {
                log.warn(format!(
                    "No se encontró clase para el grupo '{}' del equipo '{}'",
                    row.group_code, row.team_token
                ));
                continue;
            };

            let members = matcher.resolve(&row.team_token);
            for fragment in &members.unmatched {
                log.warn(format!(
                    "No se encontró estudiante con apellido '{}' para el equipo '{}'",
                    fragment, row.team_token
                ));
            }
            if members.is_empty() {
                log.warn(format!(
                    "No se encontraron miembros para el equipo '{}'",
                    row.team_token
                ));
                continue;
            }

            let team_name = row.team_name();
            if let Some(active) = &row.active {
                debug!("Team {} (row {}) active flag: {}", team_name, row_number, active);
            }

            let team = match self
                .reconciler
                .create_team(team_name.clone(), members.member_ids)
                .await
            {
                Ok(team) => team,
                Err(RosterError::Conflict(msg)) => {
                    log.warn(format!("Equipo '{}' ya existe: {}", team_name, msg));
                    continue;
                }
                Err(e) => return Err(e),
            };

            self.reconciler.attach_team(class.id, team.id).await?;
            debug!(
                "Team {} created with {} members in class {}",
                team.name,
                team.member_ids.len(),
                class.name
            );

            log.stats.teams_created += 1;
            tally.created += 1;
            tally.rows_processed += 1;
            teams.push(team);
        }

        info!("Equipos processed: {} teams", teams.len());
        Ok(Some(SheetRun {
            records: teams,
            tally,
        }))
    }
}
