//! 工作簿加载与单元格解码
//!
//! 单元格在加载时一次性解码为 [`CellValue`]，后续的行提取只处理字符串。

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use std::io::Cursor;
use tracing::debug;

use super::ImportOptions;
use super::date_parser::serial_to_date;
use crate::errors::{Result, RosterError};
use crate::utils::{file_extension, validate_magic_bytes};

/// 解码后的单元格
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Boolean(bool),
    /// 公式单元格，保存计算结果的文本
    Formula(String),
    Empty,
}

impl CellValue {
    /// 单元格的规范文本（去除首尾空白）
    pub fn text(&self) -> String {
        match self {
            CellValue::Text(s) | CellValue::Formula(s) => s.trim().to_string(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Boolean(b) => b.to_string(),
            CellValue::Empty => String::new(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text().is_empty()
    }
}

/// 整数值不带小数部分
fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

pub struct CellDecoder;

impl CellDecoder {
    pub fn decode(data: Option<&Data>, is_formula: bool) -> CellValue {
        let value = match data {
            None | Some(Data::Empty) => CellValue::Empty,
            Some(Data::String(s)) => CellValue::Text(s.clone()),
            Some(Data::Int(i)) => CellValue::Number(*i as f64),
            Some(Data::Float(f)) => CellValue::Number(*f),
            Some(Data::Bool(b)) => CellValue::Boolean(*b),
            Some(Data::DateTime(dt)) if dt.is_datetime() => match serial_to_date(dt.as_f64()) {
                Some(date) => CellValue::Text(date.format("%Y-%m-%d").to_string()),
                None => CellValue::Number(dt.as_f64()),
            },
            Some(Data::DateTime(dt)) => CellValue::Number(dt.as_f64()),
            // ODS 的 ISO 日期只保留日期部分
            Some(Data::DateTimeIso(s)) => {
                CellValue::Text(s.split('T').next().unwrap_or_default().to_string())
            }
            Some(Data::DurationIso(s)) => CellValue::Text(s.clone()),
            Some(Data::Error(e)) => CellValue::Text(e.to_string()),
        };

        match value {
            CellValue::Empty => CellValue::Empty,
            other if is_formula => CellValue::Formula(other.text()),
            other => other,
        }
    }
}

/// 解码后的工作表，行列均从 0 开始，第 0 行为表头
#[derive(Debug, Clone)]
pub struct Sheet {
    name: String,
    rows: Vec<Vec<CellValue>>,
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn header(&self) -> &[CellValue] {
        self.rows.first().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// 数据行，附带表格中的行号（从 1 开始，表头为第 1 行）
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &[CellValue])> {
        self.rows
            .iter()
            .enumerate()
            .skip(1)
            .map(|(idx, row)| (idx + 1, row.as_slice()))
    }

    pub fn data_row_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    fn from_ranges(name: &str, values: &Range<Data>, formulas: Option<&Range<String>>) -> Self {
        let Some((end_row, end_col)) = values.end() else {
            return Self::new(name, Vec::new());
        };

        let rows = (0..=end_row)
            .map(|r| {
                (0..=end_col)
                    .map(|c| {
                        let is_formula = formulas
                            .and_then(|f| f.get_value((r, c)))
                            .is_some_and(|f| !f.is_empty());
                        CellDecoder::decode(values.get_value((r, c)), is_formula)
                    })
                    .collect()
            })
            .collect();

        Self::new(name, rows)
    }
}

/// 已加载的工作簿
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    /// 按名称查找工作表（不区分大小写）
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets
            .iter()
            .find(|s| s.name().trim().eq_ignore_ascii_case(name))
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(Sheet::name).collect()
    }
}

/// 工作簿加载器
///
/// 在解析前检查空文件、扩展名、大小和文件头，任何一项失败都是结构性错误。
pub struct WorkbookLoader {
    max_file_size: usize,
    allowed_extensions: Vec<String>,
}

impl WorkbookLoader {
    pub fn new(options: &ImportOptions) -> Self {
        Self {
            max_file_size: options.max_file_size,
            allowed_extensions: options
                .allowed_extensions
                .iter()
                .map(|e| e.to_lowercase())
                .collect(),
        }
    }

    pub fn load(&self, data: &[u8], file_name: &str) -> Result<Workbook> {
        if data.is_empty() {
            return Err(RosterError::empty_file("El archivo no puede estar vacío"));
        }

        let extension = file_extension(file_name)
            .filter(|ext| self.allowed_extensions.contains(ext))
            .ok_or_else(|| {
                RosterError::unsupported_extension(format!(
                    "Solo se permiten archivos Excel ({}): '{file_name}'",
                    self.allowed_extensions.join(", ")
                ))
            })?;

        if data.len() > self.max_file_size {
            return Err(RosterError::file_too_large(format!(
                "El archivo ocupa {} bytes y el máximo permitido es {} bytes",
                data.len(),
                self.max_file_size
            )));
        }

        if !validate_magic_bytes(data, &extension) {
            return Err(RosterError::unreadable_file(format!(
                "El contenido de '{file_name}' no corresponde a un archivo {extension}"
            )));
        }

        let mut reader = open_workbook_auto_from_rs(Cursor::new(data.to_vec())).map_err(|e| {
            RosterError::unreadable_file(format!("No se pudo leer '{file_name}': {e}"))
        })?;

        let mut sheets = Vec::new();
        for name in reader.sheet_names() {
            let values = reader.worksheet_range(&name).map_err(|e| {
                RosterError::unreadable_file(format!("No se pudo leer la hoja '{name}': {e}"))
            })?;
            let formulas = reader.worksheet_formula(&name).ok();
            let sheet = Sheet::from_ranges(&name, &values, formulas.as_ref());
            debug!(
                "Loaded sheet '{}' with {} data rows",
                sheet.name(),
                sheet.data_row_count()
            );
            sheets.push(sheet);
        }

        Ok(Workbook::new(sheets))
    }
}
