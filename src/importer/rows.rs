//! 四张表的列布局与行提取

use super::workbook::CellValue;
use crate::models::imports::responses::{ColumnFormat, SheetFormat};
use super::validator::column_letter;

/// 列定义
#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub header: &'static str,
    pub field: &'static str,
    pub required: bool,
}

const fn col(header: &'static str, field: &'static str, required: bool) -> ColumnSpec {
    ColumnSpec {
        header,
        field,
        required,
    }
}

/// 工作表布局
#[derive(Debug)]
pub struct SheetSchema {
    pub name: &'static str,
    pub description: &'static str,
    pub columns: &'static [ColumnSpec],
    pub depends_on: &'static [&'static str],
}

impl SheetSchema {
    pub fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.header).collect()
    }

    pub fn to_format(&self) -> SheetFormat {
        SheetFormat {
            sheet_name: self.name.to_string(),
            description: self.description.to_string(),
            header_row: 1,
            data_start_row: 2,
            depends_on: self.depends_on.iter().map(|s| s.to_string()).collect(),
            columns: self
                .columns
                .iter()
                .enumerate()
                .map(|(idx, c)| ColumnFormat {
                    column_letter: column_letter(idx),
                    column_index: idx as u32,
                    field_name: c.field.to_string(),
                    header: c.header.to_string(),
                    required: c.required,
                })
                .collect(),
        }
    }
}

pub const GROUPS_SCHEMA: SheetSchema = SheetSchema {
    name: "Grupos",
    description: "Clases del semestre con su profesor titular y de laboratorio",
    columns: &[
        col("Clase", "clase", true),
        col("Laboratorio", "laboratorio", false),
        col("Grupo", "grupo", true),
        col("Profesor Clase", "profesorClase", true),
        col("Profesor Laboratorio", "profesorLaboratorio", false),
        col("Semestre", "semestre", true),
    ],
    depends_on: &[],
};

pub const ENTREGAS_SCHEMA: SheetSchema = SheetSchema {
    name: "Entregas",
    description: "Entregas del semestre, se crea una asignación por cada clase",
    columns: &[
        col("Responsable", "responsable", false),
        col("Trabajo", "trabajo", true),
        col("Entrega", "entrega", false),
        col("Fecha", "fecha", false),
    ],
    depends_on: &["Grupos"],
};

pub const STUDENTS_SCHEMA: SheetSchema = SheetSchema {
    name: "Estudiantes",
    description: "Estudiantes inscritos, asociados a una clase por su código de grupo",
    columns: &[
        col("Grupo", "grupo", true),
        col("Id", "id", false),
        col("Nombre", "nombre", true),
        col("Programa", "programa", false),
        col("Correo", "correo", false),
    ],
    depends_on: &["Grupos"],
};

pub const TEAMS_SCHEMA: SheetSchema = SheetSchema {
    name: "Equipos",
    description: "Equipos formados por apellidos separados por '-'",
    columns: &[
        col("Grupo", "grupo", true),
        col("Equipo", "equipo", true),
        col("Activo", "activo", false),
    ],
    depends_on: &["Grupos", "Estudiantes"],
};

/// 处理顺序
pub const ALL_SCHEMAS: [&SheetSchema; 4] = [
    &GROUPS_SCHEMA,
    &ENTREGAS_SCHEMA,
    &STUDENTS_SCHEMA,
    &TEAMS_SCHEMA,
];

/// 一行按列布局取出的文本
pub struct RowCells {
    values: Vec<String>,
}

impl RowCells {
    fn new(row: &[CellValue], width: usize) -> Self {
        let values = (0..width)
            .map(|idx| row.get(idx).map(CellValue::text).unwrap_or_default())
            .collect();
        Self { values }
    }

    pub fn text(&self, idx: usize) -> String {
        self.values.get(idx).cloned().unwrap_or_default()
    }

    pub fn optional(&self, idx: usize) -> Option<String> {
        Some(self.text(idx)).filter(|v| !v.is_empty())
    }
}

/// 行提取结果
#[derive(Debug, PartialEq)]
pub enum RowOutcome<T> {
    Record(T),
    /// 整行空白
    Blank,
    /// 缺少必填字段
    Incomplete(Vec<&'static str>),
}

pub trait SheetRow: Sized {
    const SCHEMA: &'static SheetSchema;

    /// 必填字段已确认非空
    fn from_cells(cells: &RowCells) -> Self;

    fn extract(row: &[CellValue]) -> RowOutcome<Self> {
        let columns = Self::SCHEMA.columns;
        let cells = RowCells::new(row, columns.len());

        if (0..columns.len()).all(|idx| cells.text(idx).is_empty()) {
            return RowOutcome::Blank;
        }

        let missing: Vec<&'static str> = columns
            .iter()
            .enumerate()
            .filter(|(idx, c)| c.required && cells.text(*idx).is_empty())
            .map(|(_, c)| c.header)
            .collect();

        if missing.is_empty() {
            RowOutcome::Record(Self::from_cells(&cells))
        } else {
            RowOutcome::Incomplete(missing)
        }
    }
}

/// Grupos 行，Laboratorio 列只读不用
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRow {
    pub course: String,
    pub lab: Option<String>,
    pub group_code: String,
    pub professor: String,
    pub lab_professor: Option<String>,
    pub semester: String,
}

impl GroupRow {
    /// 组合名称 `grupo-clase-semestre`
    pub fn class_name(&self) -> String {
        format!("{}-{}-{}", self.group_code, self.course, self.semester)
    }

    pub fn class_description(&self) -> String {
        let mut description = format!(
            "{} - Profesor Clase: {}",
            self.class_name(),
            self.professor
        );
        if let Some(lab_professor) = &self.lab_professor {
            description.push_str(&format!(" - Profesor Lab: {lab_professor}"));
        }
        description
    }
}

impl SheetRow for GroupRow {
    const SCHEMA: &'static SheetSchema = &GROUPS_SCHEMA;

    fn from_cells(cells: &RowCells) -> Self {
        Self {
            course: cells.text(0),
            lab: cells.optional(1),
            group_code: cells.text(2),
            professor: cells.text(3),
            lab_professor: cells.optional(4),
            semester: cells.text(5),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntregaRow {
    pub responsible: String,
    pub work: String,
    pub delivery: String,
    pub date: Option<String>,
}

impl EntregaRow {
    /// 作业标题 `classId-responsable-trabajo-entrega`
    pub fn assignment_title(&self, class_id: i64) -> String {
        format!(
            "{}-{}-{}-{}",
            class_id, self.responsible, self.work, self.delivery
        )
    }
}

impl SheetRow for EntregaRow {
    const SCHEMA: &'static SheetSchema = &ENTREGAS_SCHEMA;

    fn from_cells(cells: &RowCells) -> Self {
        Self {
            responsible: cells.text(0),
            work: cells.text(1),
            delivery: cells.text(2),
            date: cells.optional(3),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StudentRow {
    pub group_code: String,
    pub carnet_id: Option<String>,
    pub name: String,
    pub program: Option<String>,
    pub email: Option<String>,
}

impl SheetRow for StudentRow {
    const SCHEMA: &'static SheetSchema = &STUDENTS_SCHEMA;

    fn from_cells(cells: &RowCells) -> Self {
        Self {
            group_code: cells.text(0),
            carnet_id: cells.optional(1),
            name: cells.text(2),
            program: cells.optional(3),
            email: cells.optional(4),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamRow {
    pub group_code: String,
    pub team_token: String,
    pub active: Option<String>,
}

impl TeamRow {
    /// 团队名称 `grupo-equipo`
    pub fn team_name(&self) -> String {
        format!("{}-{}", self.group_code, self.team_token)
    }
}

impl SheetRow for TeamRow {
    const SCHEMA: &'static SheetSchema = &TEAMS_SCHEMA;

    fn from_cells(cells: &RowCells) -> Self {
        Self {
            group_code: cells.text(0),
            team_token: cells.text(1),
            active: cells.optional(2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: &[&str]) -> Vec<CellValue> {
        values
            .iter()
            .map(|v| {
                if v.is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::Text(v.to_string())
                }
            })
            .collect()
    }

    #[test]
    fn test_group_row_names() {
        let cells = row(&["Algoritmos", "", "3", "Juan Perez", "", "2025-1"]);
        let RowOutcome::Record(group) = GroupRow::extract(&cells) else {
            panic!("expected record");
        };
        assert_eq!(group.class_name(), "3-Algoritmos-2025-1");
        assert_eq!(
            group.class_description(),
            "3-Algoritmos-2025-1 - Profesor Clase: Juan Perez"
        );
        assert_eq!(group.lab_professor, None);
    }

    #[test]
    fn test_group_description_with_lab() {
        let cells = row(&["Redes", "Lab 1", "2", "Ana Ruiz", "Luis Gil", "2025-2"]);
        let RowOutcome::Record(group) = GroupRow::extract(&cells) else {
            panic!("expected record");
        };
        assert_eq!(
            group.class_description(),
            "2-Redes-2025-2 - Profesor Clase: Ana Ruiz - Profesor Lab: Luis Gil"
        );
    }

    #[test]
    fn test_missing_required_fields() {
        let cells = row(&["3", "1001", "", "ISIS", "ana@example.com"]);
        assert_eq!(
            StudentRow::extract(&cells),
            RowOutcome::Incomplete(vec!["Nombre"])
        );
    }

    #[test]
    fn test_blank_row() {
        assert_eq!(TeamRow::extract(&row(&["", " ", ""])), RowOutcome::Blank);
        assert_eq!(TeamRow::extract(&[]), RowOutcome::Blank);
    }

    #[test]
    fn test_short_row_defaults_optional_fields() {
        let cells = row(&["", "Proyecto"]);
        let RowOutcome::Record(entrega) = EntregaRow::extract(&cells) else {
            panic!("expected record");
        };
        assert_eq!(entrega.responsible, "");
        assert_eq!(entrega.delivery, "");
        assert_eq!(entrega.date, None);
        assert_eq!(entrega.assignment_title(7), "7--Proyecto-");
    }

    #[test]
    fn test_numeric_group_code() {
        let cells = vec![
            CellValue::Number(3.0),
            CellValue::Text("Garcia-Lopez".into()),
            CellValue::Boolean(true),
        ];
        let RowOutcome::Record(team) = TeamRow::extract(&cells) else {
            panic!("expected record");
        };
        assert_eq!(team.team_name(), "3-Garcia-Lopez");
        assert_eq!(team.active.as_deref(), Some("true"));
    }

    #[test]
    fn test_format_description() {
        let format = TEAMS_SCHEMA.to_format();
        assert_eq!(format.columns.len(), 3);
        assert_eq!(format.columns[1].column_letter, "B");
        assert!(format.columns[1].required);
        assert!(!format.columns[2].required);
        assert_eq!(format.depends_on, vec!["Grupos", "Estudiantes"]);
    }
}
