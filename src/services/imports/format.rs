use actix_web::{HttpResponse, Result as ActixResult};

use super::ImportService;
use crate::models::ApiResponse;

pub async fn get_format(service: &ImportService) -> ActixResult<HttpResponse> {
    let format = service.orchestrator().format_description();
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        format,
        "Formato de importación",
    )))
}
