//! 表头校验

use std::fmt;

use super::workbook::Sheet;

/// 表头不匹配
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderMismatch {
    pub column: usize,
    pub expected: &'static str,
    pub found: String,
}

impl fmt::Display for HeaderMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Encabezado esperado '{}' en columna {}, pero se encontró '{}'",
            self.expected,
            column_letter(self.column),
            self.found
        )
    }
}

/// 列号转列字母（0 → A，26 → AA）
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

pub struct SheetValidator;

impl SheetValidator {
    /// 按位置逐列比较第 1 行与期望的表头，返回全部不匹配项
    pub fn validate(sheet: &Sheet, expected: &[&'static str]) -> Vec<HeaderMismatch> {
        expected
            .iter()
            .enumerate()
            .filter_map(|(col, label)| {
                let found = sheet.cell(0, col).text();
                (found != *label).then(|| HeaderMismatch {
                    column: col,
                    expected: *label,
                    found,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::workbook::CellValue;

    fn header_sheet(labels: &[&str]) -> Sheet {
        let header = labels
            .iter()
            .map(|l| CellValue::Text(l.to_string()))
            .collect();
        Sheet::new("Equipos", vec![header])
    }

    #[test]
    fn test_matching_header() {
        let sheet = header_sheet(&["Grupo", " Equipo ", "Activo"]);
        assert!(SheetValidator::validate(&sheet, &["Grupo", "Equipo", "Activo"]).is_empty());
    }

    #[test]
    fn test_reports_every_mismatch() {
        let sheet = header_sheet(&["Grupo", "Team"]);
        let mismatches = SheetValidator::validate(&sheet, &["Grupo", "Equipo", "Activo"]);
        assert_eq!(mismatches.len(), 2);
        assert_eq!(
            mismatches[0].to_string(),
            "Encabezado esperado 'Equipo' en columna B, pero se encontró 'Team'"
        );
        assert_eq!(mismatches[1].column, 2);
        assert_eq!(mismatches[1].found, "");
    }

    #[test]
    fn test_extra_columns_ignored() {
        let sheet = header_sheet(&["Grupo", "Equipo", "Activo", "Notas"]);
        assert!(SheetValidator::validate(&sheet, &["Grupo", "Equipo", "Activo"]).is_empty());
    }

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(5), "F");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(27), "AB");
    }
}
