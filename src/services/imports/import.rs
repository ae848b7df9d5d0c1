//! 工作簿导入

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, warn};

use super::{ImportService, read_file_from_multipart, structural_error_code};
use crate::models::imports::responses::ImportReport;
use crate::models::{ApiResponse, ErrorCode};

pub async fn import_excel(
    service: &ImportService,
    mut payload: Multipart,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let (file_bytes, file_name) = match read_file_from_multipart(&mut payload).await {
        Ok(Some(upload)) => upload,
        Ok(None) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error(
                ErrorCode::ImportFileMissing,
                ImportReport::rejected(
                    "No se recibió ningún archivo",
                    "El campo 'file' es obligatorio",
                ),
                "No se recibió ningún archivo",
            )));
        }
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error(
                ErrorCode::ImportFileMissing,
                ImportReport::rejected("Error leyendo el archivo", e.clone()),
                format!("Error leyendo el archivo: {e}"),
            )));
        }
    };

    match service
        .orchestrator()
        .run(storage.as_ref(), &file_bytes, &file_name)
        .await
    {
        Ok(report) => {
            let message = report.message.clone();
            Ok(HttpResponse::Ok().json(ApiResponse::success(report, message)))
        }
        Err(e) if e.is_structural() => {
            warn!("Import of '{}' rejected: {}", file_name, e);
            Ok(HttpResponse::BadRequest().json(ApiResponse::error(
                structural_error_code(&e),
                ImportReport::rejected("Archivo no válido para importación", e.message()),
                e.message(),
            )))
        }
        Err(e) => {
            error!("Import of '{}' failed: {}", file_name, e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::ImportFailed,
                    format!("Error en la importación: {}", e.message()),
                )),
            )
        }
    }
}
