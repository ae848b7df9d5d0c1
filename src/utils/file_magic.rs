/// 表格文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetKind {
    /// OOXML 工作簿（ZIP 容器）
    Xlsx,
    /// 旧版 BIFF 工作簿（OLE 复合文档）
    Xls,
}

const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];
const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// 取文件扩展名（小写，包含点号），没有扩展名时返回 None
pub fn file_extension(file_name: &str) -> Option<String> {
    let name = file_name.trim();
    let idx = name.rfind('.')?;
    if idx == 0 || idx == name.len() - 1 {
        return None;
    }
    Some(name[idx..].to_lowercase())
}

/// 根据扩展名判断表格格式
pub fn spreadsheet_kind(extension: &str) -> Option<SpreadsheetKind> {
    match extension.to_lowercase().as_str() {
        ".xlsx" => Some(SpreadsheetKind::Xlsx),
        ".xls" => Some(SpreadsheetKind::Xls),
        _ => None,
    }
}

/// 验证文件内容的魔术字节是否与扩展名匹配
///
/// # Arguments
/// * `data` - 文件内容的前几个字节
/// * `extension` - 文件扩展名（包含点号，如 ".xlsx"）
///
/// # Returns
/// * `true` - 魔术字节匹配
/// * `false` - 魔术字节不匹配或扩展名不是表格格式
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    match spreadsheet_kind(extension) {
        Some(SpreadsheetKind::Xlsx) => data.starts_with(&ZIP_MAGIC),
        Some(SpreadsheetKind::Xls) => data.starts_with(&OLE_MAGIC),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xlsx_magic() {
        let header = [0x50, 0x4B, 0x03, 0x04, 0x14, 0x00];
        assert!(validate_magic_bytes(&header, ".xlsx"));
        assert!(validate_magic_bytes(&header, ".XLSX"));
        assert!(!validate_magic_bytes(&header, ".xls"));
    }

    #[test]
    fn test_xls_magic() {
        let header = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1, 0x00];
        assert!(validate_magic_bytes(&header, ".xls"));
        assert!(!validate_magic_bytes(&header, ".xlsx"));
    }

    #[test]
    fn test_text_rejected() {
        assert!(!validate_magic_bytes(b"Grupo,Nombre", ".xlsx"));
        assert!(!validate_magic_bytes(b"Grupo,Nombre", ".txt"));
    }

    #[test]
    fn test_empty_data() {
        assert!(!validate_magic_bytes(&[], ".xlsx"));
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("Roster.XLSX"), Some(".xlsx".to_string()));
        assert_eq!(file_extension("notas.txt"), Some(".txt".to_string()));
        assert_eq!(file_extension("sin_extension"), None);
        assert_eq!(file_extension("archivo."), None);
        assert_eq!(file_extension(".xlsx"), None);
    }
}
