//! 导入编排
//!
//! 状态流转：NotStarted → RolesEnsured → GroupsProcessed → DependentSheetsProcessed → Completed。
//! 结构性错误（文件不可读、扩展名不允许、空文件）在 NotStarted 直接进入 Failed，
//! 数据库故障可在任一未结束的阶段进入 Failed 并回滚事务。
//! 行级和表级问题只记录为警告，不会中断导入。

use std::fmt;
use std::time::Instant;

use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use super::ImportOptions;
use super::processors::{
    EntregasProcessor, EquiposProcessor, EstudiantesProcessor, GroupsProcessor, ImportLog,
    RoleIds, SheetRun, SheetTally,
};
use super::reconcile::Reconciler;
use super::rows::{
    ALL_SCHEMAS, ENTREGAS_SCHEMA, GROUPS_SCHEMA, STUDENTS_SCHEMA, SheetSchema, TEAMS_SCHEMA,
};
use super::validator::SheetValidator;
use super::workbook::{Sheet, Workbook, WorkbookLoader};
use crate::errors::Result;
use crate::models::imports::responses::{
    FormatDescription, FormatValidationReport, ImportReport, SheetSummary,
};
use crate::models::roster::entities::PersonRole;
use crate::storage::{ImportSession, Storage};

/// 导入阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportPhase {
    NotStarted,
    RolesEnsured,
    GroupsProcessed,
    DependentSheetsProcessed,
    Completed,
    Failed,
}

impl ImportPhase {
    pub fn can_transition_to(self, next: ImportPhase) -> bool {
        use ImportPhase::*;
        matches!(
            (self, next),
            (NotStarted, RolesEnsured)
                | (NotStarted, Failed)
                | (RolesEnsured, GroupsProcessed)
                | (GroupsProcessed, DependentSheetsProcessed)
                | (DependentSheetsProcessed, Completed)
                | (RolesEnsured | GroupsProcessed | DependentSheetsProcessed, Failed)
        )
    }
}

impl fmt::Display for ImportPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// 单次导入的阶段跟踪
struct PhaseTracker {
    phase: ImportPhase,
}

impl PhaseTracker {
    fn new() -> Self {
        Self {
            phase: ImportPhase::NotStarted,
        }
    }

    fn advance(&mut self, next: ImportPhase) {
        if self.phase.can_transition_to(next) {
            debug!("Import phase {} -> {}", self.phase, next);
        } else {
            warn!("Unexpected import phase transition {} -> {}", self.phase, next);
        }
        self.phase = next;
    }
}

pub struct ImportOrchestrator {
    options: ImportOptions,
}

impl ImportOrchestrator {
    pub fn new(options: ImportOptions) -> Self {
        Self { options }
    }

    /// 执行一次完整导入
    ///
    /// 返回 `Err` 仅限结构性错误和数据库故障，此时事务已回滚。
    pub async fn run(
        &self,
        storage: &dyn Storage,
        data: &[u8],
        file_name: &str,
    ) -> Result<ImportReport> {
        let span = info_span!("excel_import", import_id = %Uuid::new_v4(), file = %file_name);
        async move {
            let mut phase = PhaseTracker::new();
            match self.execute(storage, data, file_name, &mut phase).await {
                Ok(report) => {
                    phase.advance(ImportPhase::Completed);
                    info!(
                        "Import finished: success={}, warnings={}",
                        report.success,
                        report.errors.len()
                    );
                    Ok(report)
                }
                Err(e) => {
                    phase.advance(ImportPhase::Failed);
                    error!("Import aborted: {}", e);
                    Err(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn execute(
        &self,
        storage: &dyn Storage,
        data: &[u8],
        file_name: &str,
        phase: &mut PhaseTracker,
    ) -> Result<ImportReport> {
        let workbook = WorkbookLoader::new(&self.options).load(data, file_name)?;
        info!("Workbook loaded with sheets: {:?}", workbook.sheet_names());

        let session = storage.begin_import().await?;
        let mut log = ImportLog::default();

        let roles = ensure_roles(session.as_ref(), &mut log).await?;
        phase.advance(ImportPhase::RolesEnsured);

        let sheets = process_sheets(session.as_ref(), &workbook, roles, &mut log, phase).await?;

        session.commit().await?;

        let ImportLog {
            mut stats,
            warnings,
        } = log;
        stats.finalize();

        let any_processed = sheets.iter().any(|s| s.processed);
        let message = if any_processed {
            format!(
                "Importación completa finalizada. Roles: {} creados. Usuarios: {} creados, {} actualizados. Clases: {} creadas, {} actualizadas. Entregas: {} creadas, {} actualizadas. Equipos: {} creados",
                stats.roles_created,
                stats.users_created,
                stats.users_updated,
                stats.classes_created,
                stats.classes_updated,
                stats.assignments_created,
                stats.assignments_updated,
                stats.teams_created
            )
        } else {
            "No se encontraron hojas válidas para importar".to_string()
        };

        Ok(ImportReport {
            success: any_processed,
            message,
            stats,
            errors: warnings,
            sheets,
        })
    }

    /// 只校验工作表和表头，不访问数据库
    pub fn validate(&self, data: &[u8], file_name: &str) -> Result<FormatValidationReport> {
        let workbook = WorkbookLoader::new(&self.options).load(data, file_name)?;

        let mut valid_sheets = Vec::new();
        let mut errors = Vec::new();

        for schema in ALL_SCHEMAS {
            let Some(sheet) = workbook.sheet(schema.name) else {
                errors.push(format!("Hoja '{}' no encontrada en el archivo", schema.name));
                continue;
            };

            let mismatches = SheetValidator::validate(sheet, &schema.headers());
            if mismatches.is_empty() {
                valid_sheets.push(schema.name.to_string());
            } else {
                errors.extend(
                    mismatches
                        .iter()
                        .map(|m| format!("Hoja '{}': {}", schema.name, m)),
                );
            }
        }

        let success = !valid_sheets.is_empty() && errors.is_empty();
        let message = match errors.first() {
            None if success => "Formato válido - Archivo listo para importación".to_string(),
            None => "Formato inválido - No se encontraron hojas válidas".to_string(),
            Some(first) => format!("Formato inválido - Revisar errores {first}"),
        };

        Ok(FormatValidationReport {
            success,
            message,
            valid_sheets,
            errors,
        })
    }

    /// 导入格式说明
    pub fn format_description(&self) -> FormatDescription {
        FormatDescription {
            description: "Archivo Excel con las hojas Grupos, Entregas, Estudiantes y Equipos. \
                La fila 1 contiene los encabezados y los datos comienzan en la fila 2."
                .to_string(),
            version: "1.0".to_string(),
            supported_extensions: self.options.allowed_extensions.clone(),
            sheets: ALL_SCHEMAS.iter().map(|s| s.to_format()).collect(),
        }
    }
}

/// 确保 PROFESOR 与 ESTUDIANTE 角色存在
async fn ensure_roles(session: &dyn ImportSession, log: &mut ImportLog) -> Result<RoleIds> {
    let (professor, created) = session.ensure_role(PersonRole::Profesor).await?;
    if created {
        log.stats.roles_created += 1;
    }
    let (student, created) = session.ensure_role(PersonRole::Estudiante).await?;
    if created {
        log.stats.roles_created += 1;
    }
    Ok(RoleIds {
        professor: professor.id,
        student: student.id,
    })
}

/// 依次处理四张表，返回每张表的处理摘要
async fn process_sheets(
    session: &dyn ImportSession,
    workbook: &Workbook,
    roles: RoleIds,
    log: &mut ImportLog,
    phase: &mut PhaseTracker,
) -> Result<Vec<SheetSummary>> {
    let reconciler = Reconciler::new(session);
    let mut summaries = Vec::new();

    // Grupos
    let started = Instant::now();
    let classes = match workbook.sheet(GROUPS_SCHEMA.name) {
        Some(sheet) => {
            info!("Processing sheet: {}", sheet.name());
            let run = GroupsProcessor::new(&reconciler, roles)
                .process(sheet, log)
                .await?;
            summaries.push(summarize(&GROUPS_SCHEMA, run.as_ref(), started));
            run.map(|r| r.records).unwrap_or_default()
        }
        None => {
            missing_sheet(&GROUPS_SCHEMA, log, &mut summaries);
            Vec::new()
        }
    };
    phase.advance(ImportPhase::GroupsProcessed);

    // Entregas
    let started = Instant::now();
    match dependent_sheet(workbook, &ENTREGAS_SCHEMA, log, &mut summaries) {
        Some(_) if classes.is_empty() => skip_sheet(
            &ENTREGAS_SCHEMA,
            "No se pueden procesar entregas sin clases creadas previamente",
            log,
            &mut summaries,
        ),
        Some(sheet) => {
            let run = EntregasProcessor::new(&reconciler)
                .process(sheet, &classes, log)
                .await?;
            summaries.push(summarize(&ENTREGAS_SCHEMA, run.as_ref(), started));
        }
        None => {}
    }

    // Estudiantes
    let started = Instant::now();
    let students = match dependent_sheet(workbook, &STUDENTS_SCHEMA, log, &mut summaries) {
        Some(_) if classes.is_empty() => {
            skip_sheet(
                &STUDENTS_SCHEMA,
                "No se pueden procesar estudiantes sin clases creadas previamente",
                log,
                &mut summaries,
            );
            Vec::new()
        }
        Some(sheet) => {
            let run = EstudiantesProcessor::new(&reconciler, roles)
                .process(sheet, &classes, log)
                .await?;
            summaries.push(summarize(&STUDENTS_SCHEMA, run.as_ref(), started));
            run.map(|r| r.records).unwrap_or_default()
        }
        None => Vec::new(),
    };

    // Equipos
    let started = Instant::now();
    match dependent_sheet(workbook, &TEAMS_SCHEMA, log, &mut summaries) {
        Some(_) if classes.is_empty() => skip_sheet(
            &TEAMS_SCHEMA,
            "No se pueden procesar equipos sin clases creadas previamente",
            log,
            &mut summaries,
        ),
        Some(_) if students.is_empty() => skip_sheet(
            &TEAMS_SCHEMA,
            "No se pueden procesar equipos sin estudiantes creados previamente",
            log,
            &mut summaries,
        ),
        Some(sheet) => {
            let run = EquiposProcessor::new(&reconciler)
                .process(sheet, &classes, &students, log)
                .await?;
            summaries.push(summarize(&TEAMS_SCHEMA, run.as_ref(), started));
        }
        None => {}
    }
    phase.advance(ImportPhase::DependentSheetsProcessed);

    Ok(summaries)
}

/// 查找依赖表，不存在时记录警告
fn dependent_sheet<'w>(
    workbook: &'w Workbook,
    schema: &SheetSchema,
    log: &mut ImportLog,
    summaries: &mut Vec<SheetSummary>,
) -> Option<&'w Sheet> {
    let sheet = workbook.sheet(schema.name);
    match sheet {
        Some(sheet) => info!("Processing sheet: {}", sheet.name()),
        None => missing_sheet(schema, log, summaries),
    }
    sheet
}

fn missing_sheet(schema: &SheetSchema, log: &mut ImportLog, summaries: &mut Vec<SheetSummary>) {
    log.warn(format!("Hoja '{}' no encontrada", schema.name));
    summaries.push(unprocessed(schema));
}

fn skip_sheet(
    schema: &SheetSchema,
    reason: &str,
    log: &mut ImportLog,
    summaries: &mut Vec<SheetSummary>,
) {
    log.warn(reason);
    summaries.push(unprocessed(schema));
}

fn unprocessed(schema: &SheetSchema) -> SheetSummary {
    SheetSummary {
        sheet_name: schema.name.to_string(),
        processed: false,
        rows_processed: 0,
        records_created: 0,
        records_updated: 0,
        elapsed_ms: 0,
    }
}

fn summarize<T>(schema: &SheetSchema, run: Option<&SheetRun<T>>, started: Instant) -> SheetSummary {
    let tally = run.map(|r| r.tally).unwrap_or_default();
    let SheetTally {
        rows_processed,
        created,
        updated,
    } = tally;
    SheetSummary {
        sheet_name: schema.name.to_string(),
        processed: run.is_some(),
        rows_processed,
        records_created: created,
        records_updated: updated,
        elapsed_ms: started.elapsed().as_millis() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_transitions() {
        use ImportPhase::*;
        assert!(NotStarted.can_transition_to(RolesEnsured));
        assert!(NotStarted.can_transition_to(Failed));
        assert!(RolesEnsured.can_transition_to(GroupsProcessed));
        assert!(GroupsProcessed.can_transition_to(DependentSheetsProcessed));
        assert!(DependentSheetsProcessed.can_transition_to(Completed));

        assert!(!NotStarted.can_transition_to(Completed));
        assert!(GroupsProcessed.can_transition_to(Failed));
        assert!(!Completed.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(RolesEnsured));
        assert!(!Completed.can_transition_to(NotStarted));
    }

    #[test]
    fn test_format_description() {
        let orchestrator = ImportOrchestrator::new(ImportOptions::default());
        let format = orchestrator.format_description();
        assert_eq!(format.version, "1.0");
        let names: Vec<_> = format.sheets.iter().map(|s| s.sheet_name.as_str()).collect();
        assert_eq!(names, vec!["Grupos", "Entregas", "Estudiantes", "Equipos"]);
        assert_eq!(format.sheets[0].columns[5].header, "Semestre");
        assert_eq!(format.supported_extensions, vec![".xlsx", ".xls"]);
    }
}
