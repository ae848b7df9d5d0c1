use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 导入统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "import.ts")]
pub struct ImportStats {
    pub roles_created: u32,
    pub users_created: u32,
    pub users_updated: u32,
    pub classes_created: u32,
    pub classes_updated: u32,
    pub assignments_created: u32,
    pub assignments_updated: u32,
    pub teams_created: u32,
    pub total_processed: u32,
}

impl ImportStats {
    /// 汇总已处理记录数
    pub fn finalize(&mut self) {
        self.total_processed = self.users_created
            + self.users_updated
            + self.classes_created
            + self.classes_updated
            + self.assignments_created
            + self.assignments_updated
            + self.teams_created;
    }
}

// 单个工作表的处理结果
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "import.ts")]
pub struct SheetSummary {
    pub sheet_name: String,
    pub processed: bool,
    pub rows_processed: u32,
    pub records_created: u32,
    pub records_updated: u32,
    #[ts(type = "number")]
    pub elapsed_ms: u64,
}

// 导入报告
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "import.ts")]
pub struct ImportReport {
    pub success: bool,
    pub message: String,
    pub stats: ImportStats,
    pub errors: Vec<String>,
    pub sheets: Vec<SheetSummary>,
}

impl ImportReport {
    /// 结构性失败时的报告，统计全部为零
    pub fn rejected(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            stats: ImportStats::default(),
            errors: vec![error.into()],
            sheets: Vec::new(),
        }
    }
}

// 格式校验结果（不写入数据库）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "import.ts")]
pub struct FormatValidationReport {
    pub success: bool,
    pub message: String,
    pub valid_sheets: Vec<String>,
    pub errors: Vec<String>,
}

// 列格式说明
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "import.ts")]
pub struct ColumnFormat {
    pub column_letter: String,
    pub column_index: u32,
    pub field_name: String,
    pub header: String,
    pub required: bool,
}

// 工作表格式说明
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "import.ts")]
pub struct SheetFormat {
    pub sheet_name: String,
    pub description: String,
    pub header_row: u32,
    pub data_start_row: u32,
    pub depends_on: Vec<String>,
    pub columns: Vec<ColumnFormat>,
}

// 完整导入格式说明
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "import.ts")]
pub struct FormatDescription {
    pub description: String,
    pub version: String,
    pub supported_extensions: Vec<String>,
    pub sheets: Vec<SheetFormat>,
}
