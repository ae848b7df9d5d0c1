//! 工作簿格式校验（不写入数据库）

use actix_multipart::Multipart;
use actix_web::{HttpResponse, Result as ActixResult};

use super::{ImportService, read_file_from_multipart, structural_error_code};
use crate::models::imports::responses::FormatValidationReport;
use crate::models::{ApiResponse, ErrorCode};

fn rejected(message: &str, error: String) -> FormatValidationReport {
    FormatValidationReport {
        success: false,
        message: message.to_string(),
        valid_sheets: Vec::new(),
        errors: vec![error],
    }
}

pub async fn validate_excel(
    service: &ImportService,
    mut payload: Multipart,
) -> ActixResult<HttpResponse> {
    let (file_bytes, file_name) = match read_file_from_multipart(&mut payload).await {
        Ok(Some(upload)) => upload,
        Ok(None) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error(
                ErrorCode::ImportFileMissing,
                rejected(
                    "No se recibió ningún archivo",
                    "El campo 'file' es obligatorio".to_string(),
                ),
                "No se recibió ningún archivo",
            )));
        }
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error(
                ErrorCode::ImportFileMissing,
                rejected("Error leyendo el archivo", e),
                "Error leyendo el archivo",
            )));
        }
    };

    match service.orchestrator().validate(&file_bytes, &file_name) {
        Ok(report) if report.success => {
            let message = report.message.clone();
            Ok(HttpResponse::Ok().json(ApiResponse::success(report, message)))
        }
        Ok(report) => {
            let message = report.message.clone();
            Ok(HttpResponse::Ok().json(ApiResponse::error(
                ErrorCode::ImportFormatInvalid,
                report,
                message,
            )))
        }
        Err(e) => Ok(HttpResponse::BadRequest().json(ApiResponse::error(
            structural_error_code(&e),
            rejected("Formato inválido", e.message().to_string()),
            e.message(),
        ))),
    }
}
