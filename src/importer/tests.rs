//! 流水线测试：内存中生成工作簿，写入内存 SQLite

use chrono::NaiveDate;
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};

use super::{ImportOptions, ImportOrchestrator};
use crate::config::DatabaseConfig;
use crate::errors::RosterError;
use crate::storage::Storage;
use crate::storage::sea_orm_storage::SeaOrmStorage;

const GROUPS: &[&str] = &[
    "Clase",
    "Laboratorio",
    "Grupo",
    "Profesor Clase",
    "Profesor Laboratorio",
    "Semestre",
];
const ENTREGAS: &[&str] = &["Responsable", "Trabajo", "Entrega", "Fecha"];
const STUDENTS: &[&str] = &["Grupo", "Id", "Nombre", "Programa", "Correo"];
const TEAMS: &[&str] = &["Grupo", "Equipo", "Activo"];

struct SheetFixture<'a> {
    name: &'a str,
    header: &'a [&'a str],
    rows: Vec<Vec<&'a str>>,
}

fn sheet<'a>(name: &'a str, header: &'a [&'a str], rows: Vec<Vec<&'a str>>) -> SheetFixture<'a> {
    SheetFixture { name, header, rows }
}

fn build_workbook(sheets: &[SheetFixture<'_>]) -> Vec<u8> {
    let mut workbook = XlsxWorkbook::new();
    for fixture in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(fixture.name).unwrap();
        for (col, header) in fixture.header.iter().enumerate() {
            worksheet.write_string(0, col as u16, *header).unwrap();
        }
        for (row, values) in fixture.rows.iter().enumerate() {
            for (col, value) in values.iter().enumerate() {
                if !value.is_empty() {
                    worksheet
                        .write_string(row as u32 + 1, col as u16, *value)
                        .unwrap();
                }
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

async fn memory_storage() -> SeaOrmStorage {
    SeaOrmStorage::connect(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        pool_size: 1,
        timeout: 5,
    })
    .await
    .unwrap()
}

fn orchestrator() -> ImportOrchestrator {
    ImportOrchestrator::new(ImportOptions::default())
}

fn roster_workbook() -> Vec<u8> {
    build_workbook(&[
        sheet(
            "Grupos",
            GROUPS,
            vec![vec!["Algoritmos", "", "3", "Juan Perez", "", "2025-1"]],
        ),
        sheet("Estudiantes", STUDENTS, vec![vec!["3", "", "Ana Garcia", "", ""]]),
        sheet("Equipos", TEAMS, vec![vec!["3", "Garcia", "Si"]]),
    ])
}

#[tokio::test]
async fn test_end_to_end_roster() {
    let storage = memory_storage().await;
    let report = orchestrator()
        .run(&storage, &roster_workbook(), "semestre.xlsx")
        .await
        .unwrap();

    assert!(report.success);
    assert_eq!(report.stats.roles_created, 2);
    assert_eq!(report.stats.classes_created, 1);
    assert_eq!(report.stats.users_created, 2);
    assert_eq!(report.stats.teams_created, 1);
    assert!(report.errors.contains(&"Hoja 'Entregas' no encontrada".to_string()));

    let classes = storage.list_classes().await.unwrap();
    assert_eq!(classes.len(), 1);
    assert_eq!(classes[0].name, "3-Algoritmos-2025-1");
    assert_eq!(
        classes[0].description.as_deref(),
        Some("3-Algoritmos-2025-1 - Profesor Clase: Juan Perez")
    );

    let persons = storage.list_persons().await.unwrap();
    assert_eq!(persons.len(), 2);
    let student = persons.iter().find(|p| p.name == "Ana Garcia").unwrap();

    let team = storage.get_team_by_name("3-Garcia").await.unwrap().unwrap();
    assert_eq!(team.member_ids, vec![student.id]);

    let class_teams = storage.list_teams_by_class(classes[0].id).await.unwrap();
    assert_eq!(class_teams.len(), 1);
    assert_eq!(class_teams[0].name, "3-Garcia");
}

#[tokio::test]
async fn test_reimport_updates_classes() {
    let storage = memory_storage().await;
    let data = roster_workbook();

    let first = orchestrator().run(&storage, &data, "a.xlsx").await.unwrap();
    assert_eq!(first.stats.classes_created, 1);

    let second = orchestrator().run(&storage, &data, "a.xlsx").await.unwrap();
    assert!(second.success);
    assert_eq!(second.stats.roles_created, 0);
    assert_eq!(second.stats.classes_created, 0);
    assert_eq!(second.stats.classes_updated, 1);
    assert_eq!(second.stats.users_created, 0);
    assert_eq!(second.stats.users_updated, 2);
    assert_eq!(second.stats.teams_created, 0);
    assert!(
        second
            .errors
            .iter()
            .any(|e| e.starts_with("Equipo '3-Garcia' ya existe"))
    );

    assert_eq!(storage.list_classes().await.unwrap().len(), 1);
    assert_eq!(storage.list_persons().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_one_delivery_per_class() {
    let storage = memory_storage().await;
    let data = build_workbook(&[
        sheet(
            "Grupos",
            GROUPS,
            vec![
                vec!["Algoritmos", "", "1", "Juan Perez", "", "2025-1"],
                vec!["Algoritmos", "", "2", "Juan Perez", "", "2025-1"],
                vec!["Algoritmos", "", "3", "Maria Diaz", "Luis Gil", "2025-1"],
            ],
        ),
        sheet(
            "Entregas",
            ENTREGAS,
            vec![vec!["Ana", "Proyecto", "Final", "2025-02-15"]],
        ),
    ]);

    let report = orchestrator().run(&storage, &data, "e.xlsx").await.unwrap();
    assert_eq!(report.stats.classes_created, 3);
    assert_eq!(report.stats.assignments_created, 3);
    // Juan Perez 第二次出现计为更新
    assert_eq!(report.stats.users_created, 3);
    assert_eq!(report.stats.users_updated, 1);

    let due = NaiveDate::from_ymd_opt(2025, 2, 15)
        .unwrap()
        .and_hms_opt(23, 59, 0)
        .unwrap();
    let start = NaiveDate::from_ymd_opt(2025, 2, 8)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    let mut titles = Vec::new();
    for class in storage.list_classes().await.unwrap() {
        let assignments = storage.list_assignments_by_class(class.id).await.unwrap();
        assert_eq!(assignments.len(), 1);
        let assignment = &assignments[0];
        assert_eq!(assignment.title, format!("{}-Ana-Proyecto-Final", class.id));
        assert_eq!(
            assignment.description,
            format!("{}-Ana-Proyecto-Final - Final", class.id)
        );
        assert_eq!(assignment.due_date, Some(due));
        assert_eq!(assignment.start_date, Some(start));
        titles.push(assignment.title.clone());
    }
    titles.sort();
    titles.dedup();
    assert_eq!(titles.len(), 3);
}

#[tokio::test]
async fn test_bad_header_isolated_to_its_sheet() {
    let storage = memory_storage().await;
    let data = build_workbook(&[
        sheet(
            "Grupos",
            GROUPS,
            vec![vec!["Algoritmos", "", "3", "Juan Perez", "", "2025-1"]],
        ),
        sheet(
            "Entregas",
            ENTREGAS,
            vec![vec!["Ana", "Proyecto", "Final", "15/02/2025"]],
        ),
        sheet(
            "Estudiantes",
            &["Grupo", "Carnet", "Nombre", "Programa", "Correo"],
            vec![vec!["3", "1001", "Ana Garcia", "", ""]],
        ),
        sheet("Equipos", TEAMS, vec![vec!["3", "Garcia", ""]]),
    ]);

    let report = orchestrator().run(&storage, &data, "h.xlsx").await.unwrap();
    assert!(report.success);
    assert_eq!(report.stats.classes_created, 1);
    assert_eq!(report.stats.assignments_created, 1);
    assert_eq!(report.stats.users_created, 1);

    let summary = |name: &str| report.sheets.iter().find(|s| s.sheet_name == name).unwrap();
    assert!(summary("Grupos").processed);
    assert_eq!(summary("Entregas").rows_processed, 1);
    assert!(!summary("Estudiantes").processed);
    assert!(!summary("Equipos").processed);

    assert!(report.errors.contains(
        &"Hoja 'Estudiantes': Encabezado esperado 'Id' en columna B, pero se encontró 'Carnet'"
            .to_string()
    ));
    assert!(report.errors.contains(
        &"No se pueden procesar equipos sin estudiantes creados previamente".to_string()
    ));
}

#[tokio::test]
async fn test_unmatched_team_not_created() {
    let storage = memory_storage().await;
    let data = build_workbook(&[
        sheet(
            "Grupos",
            GROUPS,
            vec![vec!["Algoritmos", "", "3", "Juan Perez", "", "2025-1"]],
        ),
        sheet(
            "Estudiantes",
            STUDENTS,
            vec![
                vec!["3", "1001", "Ana Garcia Torres", "ISIS", "ana@example.com"],
                vec!["3", "1002", "Pedro Lopez Diaz", "ISIS", ""],
                vec!["7", "1003", "Sin Clase", "", ""],
            ],
        ),
        sheet(
            "Equipos",
            TEAMS,
            vec![vec!["3", "Garcia-Lopez", ""], vec!["3", "Martinez", ""]],
        ),
    ]);

    let report = orchestrator().run(&storage, &data, "t.xlsx").await.unwrap();
    assert_eq!(report.stats.users_created, 3);
    assert_eq!(report.stats.teams_created, 1);

    let team = storage
        .get_team_by_name("3-Garcia-Lopez")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(team.member_ids.len(), 2);
    assert!(storage.get_team_by_name("3-Martinez").await.unwrap().is_none());

    assert!(report.errors.contains(
        &"No se encontró clase para el grupo '7' del estudiante 'Sin Clase'".to_string()
    ));
    assert!(
        report
            .errors
            .contains(&"No se encontraron miembros para el equipo 'Martinez'".to_string())
    );

    let persons = storage.list_persons().await.unwrap();
    let ana = persons.iter().find(|p| p.name == "Ana Garcia Torres").unwrap();
    assert_eq!(ana.email.as_deref(), Some("ana@example.com"));
    assert_eq!(ana.carnet_id.as_deref(), Some("1001"));
}

#[tokio::test]
async fn test_invalid_date_still_creates_assignment() {
    let storage = memory_storage().await;
    let data = build_workbook(&[
        sheet(
            "Grupos",
            GROUPS,
            vec![vec!["Redes", "", "2", "Ana Ruiz", "", "2025-2"]],
        ),
        sheet(
            "Entregas",
            ENTREGAS,
            vec![vec!["", "Informe", "", "mañana"], vec!["", "", "Final", ""]],
        ),
    ]);

    let report = orchestrator().run(&storage, &data, "d.xlsx").await.unwrap();
    assert_eq!(report.stats.assignments_created, 1);
    assert!(
        report
            .errors
            .iter()
            .any(|e| e.starts_with("Formato de fecha inválido 'mañana' para entrega 'Informe'"))
    );
    assert!(report.errors.contains(
        &"Fila 3 de 'Entregas': Campos obligatorios vacíos (Trabajo), saltando".to_string()
    ));

    let class = &storage.list_classes().await.unwrap()[0];
    let assignments = storage.list_assignments_by_class(class.id).await.unwrap();
    assert_eq!(assignments[0].due_date, None);
    assert_eq!(assignments[0].description, format!("{}--Informe-", class.id));
}

#[tokio::test]
async fn test_date_formatted_cell() {
    let mut workbook = XlsxWorkbook::new();
    let groups = workbook.add_worksheet();
    groups.set_name("Grupos").unwrap();
    for (col, header) in GROUPS.iter().enumerate() {
        groups.write_string(0, col as u16, *header).unwrap();
    }
    for (col, value) in ["Redes", "", "2", "Ana Ruiz", "", "2025-2"].iter().enumerate() {
        if !value.is_empty() {
            groups.write_string(1, col as u16, *value).unwrap();
        }
    }

    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let entregas = workbook.add_worksheet();
    entregas.set_name("Entregas").unwrap();
    for (col, header) in ENTREGAS.iter().enumerate() {
        entregas.write_string(0, col as u16, *header).unwrap();
    }
    entregas.write_string(1, 1, "Informe").unwrap();
    // 45703 = 2025-02-15
    entregas
        .write_number_with_format(1, 3, 45703.0, &date_format)
        .unwrap();
    let data = workbook.save_to_buffer().unwrap();

    let storage = memory_storage().await;
    let report = orchestrator().run(&storage, &data, "f.xlsx").await.unwrap();
    assert_eq!(report.stats.assignments_created, 1);

    let class = &storage.list_classes().await.unwrap()[0];
    let assignments = storage.list_assignments_by_class(class.id).await.unwrap();
    assert_eq!(
        assignments[0].due_date.map(|d| d.date()),
        NaiveDate::from_ymd_opt(2025, 2, 15)
    );
}

#[tokio::test]
async fn test_text_file_rejected() {
    let storage = memory_storage().await;
    let err = orchestrator()
        .run(&storage, b"Clase,Grupo\nAlgoritmos,3\n", "roster.txt")
        .await
        .unwrap_err();

    assert!(err.is_structural());
    assert!(matches!(err, RosterError::UnsupportedExtension(_)));
    assert!(storage.list_persons().await.unwrap().is_empty());
    assert!(storage.list_classes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_upload_rejected() {
    let storage = memory_storage().await;
    let err = orchestrator()
        .run(&storage, &[], "roster.xlsx")
        .await
        .unwrap_err();
    assert!(matches!(err, RosterError::EmptyFile(_)));
}

#[tokio::test]
async fn test_no_usable_sheets() {
    let storage = memory_storage().await;
    let data = build_workbook(&[sheet("Notas", &["Nombre"], vec![vec!["Ana"]])]);

    let report = orchestrator().run(&storage, &data, "n.xlsx").await.unwrap();
    assert!(!report.success);
    assert_eq!(report.message, "No se encontraron hojas válidas para importar");
    assert_eq!(report.errors.len(), 4);
    assert_eq!(report.stats.classes_created, 0);
}

#[test]
fn test_validate_only() {
    let orchestrator = orchestrator();

    let complete = build_workbook(&[
        sheet("Grupos", GROUPS, vec![]),
        sheet("Entregas", ENTREGAS, vec![]),
        sheet("Estudiantes", STUDENTS, vec![]),
        sheet("Equipos", TEAMS, vec![]),
    ]);
    let report = orchestrator.validate(&complete, "ok.xlsx").unwrap();
    assert!(report.success);
    assert_eq!(report.message, "Formato válido - Archivo listo para importación");
    assert_eq!(report.valid_sheets.len(), 4);

    let partial = build_workbook(&[
        sheet("Grupos", GROUPS, vec![]),
        sheet("Equipos", &["Grupo", "Team", "Activo"], vec![]),
    ]);
    let report = orchestrator.validate(&partial, "partial.xlsx").unwrap();
    assert!(!report.success);
    assert_eq!(report.valid_sheets, vec!["Grupos"]);
    assert_eq!(
        report.message,
        "Formato inválido - Revisar errores Hoja 'Entregas' no encontrada en el archivo"
    );
    assert_eq!(report.errors.len(), 3);
}
