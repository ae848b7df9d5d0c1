use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "api.ts")]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    NotFound = 1004,
    InternalServerError = 1005,

    // 导入相关
    ImportFileMissing = 3000,
    ImportFileDataInvalid = 3001,
    ImportFileTooLarge = 3002,
    FileTypeNotAllowed = 3003,
    ImportFailed = 3004,
    ImportFormatInvalid = 3005,
    TemplateGenerationFailed = 3006,
}
