use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::services::ImportService;

// 懒加载的全局 ImportService 实例
static IMPORT_SERVICE: Lazy<ImportService> = Lazy::new(ImportService::new_lazy);

// HTTP处理程序
pub async fn import_excel(req: HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
    IMPORT_SERVICE.import_excel(payload, &req).await
}

pub async fn validate_excel(payload: Multipart) -> ActixResult<HttpResponse> {
    IMPORT_SERVICE.validate_excel(payload).await
}

pub async fn get_format() -> ActixResult<HttpResponse> {
    IMPORT_SERVICE.get_format().await
}

pub async fn download_template() -> ActixResult<HttpResponse> {
    IMPORT_SERVICE.download_template().await
}

// 配置路由
pub fn configure_import_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/import")
            .route("/excel", web::post().to(import_excel))
            .route("/excel/validate", web::post().to(validate_excel))
            .route("/excel/format", web::get().to(get_format))
            .route("/excel/template", web::get().to(download_template)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, http::header, test};
    use rust_xlsxwriter::Workbook;
    use std::sync::Arc;

    use crate::config::DatabaseConfig;
    use crate::storage::{Storage, create_storage};

    const BOUNDARY: &str = "roster-upload-boundary";

    async fn memory_storage() -> Arc<dyn Storage> {
        create_storage(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            pool_size: 1,
            timeout: 5,
        })
        .await
        .unwrap()
    }

    fn multipart_body(file_name: &str, content: &[u8]) -> Vec<u8> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(file_name: &str, content: &[u8]) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/v1/import/excel")
            .insert_header((
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(multipart_body(file_name, content))
    }

    fn groups_workbook() -> Vec<u8> {
        let headers = [
            "Clase",
            "Laboratorio",
            "Grupo",
            "Profesor Clase",
            "Profesor Laboratorio",
            "Semestre",
        ];
        let row = ["Algoritmos", "", "3", "Juan Perez", "", "2025-1"];

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Grupos").unwrap();
        for (col, (header, value)) in headers.iter().zip(row).enumerate() {
            worksheet.write_string(0, col as u16, *header).unwrap();
            if !value.is_empty() {
                worksheet.write_string(1, col as u16, value).unwrap();
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    #[actix_web::test]
    async fn test_format_endpoint() {
        let app = test::init_service(App::new().configure(configure_import_routes)).await;
        let req = test::TestRequest::get()
            .uri("/api/v1/import/excel/format")
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["code"], 0);
        assert_eq!(body["data"]["version"], "1.0");
        assert_eq!(body["data"]["sheets"][0]["sheetName"], "Grupos");
    }

    #[actix_web::test]
    async fn test_template_endpoint() {
        let app = test::init_service(App::new().configure(configure_import_routes)).await;
        let req = test::TestRequest::get()
            .uri("/api/v1/import/excel/template")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let body = test::read_body(resp).await;
        assert_eq!(&body[..2], b"PK");
    }

    #[actix_web::test]
    async fn test_import_rejects_text_upload() {
        let storage = memory_storage().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .configure(configure_import_routes),
        )
        .await;

        let req = upload_request("roster.txt", b"Grupo,Equipo\n").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_ne!(body["code"], 0);
        assert_eq!(body["data"]["success"], false);
        let errors = body["data"]["errors"].as_array().unwrap();
        assert!(!errors.is_empty());
        assert!(errors[0].as_str().unwrap().contains("roster.txt"));

        assert!(storage.list_persons().await.unwrap().is_empty());
        assert!(storage.list_classes().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_import_workbook_returns_report() {
        let storage = memory_storage().await;
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(storage.clone()))
                .configure(configure_import_routes),
        )
        .await;

        let req = upload_request("roster.xlsx", &groups_workbook()).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 0);
        assert_eq!(body["data"]["success"], true);
        assert_eq!(body["data"]["stats"]["classesCreated"], 1);
        assert_eq!(body["data"]["stats"]["usersCreated"], 1);

        let classes = storage.list_classes().await.unwrap();
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].name, "3-Algoritmos-2025-1");
    }
}
