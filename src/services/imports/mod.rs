pub mod format;
pub mod import;
pub mod template;
pub mod validate;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::StreamExt;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::RosterError;
use crate::importer::{ImportOptions, ImportOrchestrator};
use crate::models::ErrorCode;
use crate::storage::Storage;

/// 存储在请求时从 `app_data` 取得
pub struct ImportService;

impl ImportService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        request
            .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
            .expect("Storage not found in app data")
            .get_ref()
            .clone()
    }

    /// 导入选项取自全局配置
    pub(crate) fn orchestrator(&self) -> ImportOrchestrator {
        ImportOrchestrator::new(ImportOptions::from(&AppConfig::get().import))
    }

    // 导入工作簿
    pub async fn import_excel(
        &self,
        payload: Multipart,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        import::import_excel(self, payload, request).await
    }

    // 只校验格式
    pub async fn validate_excel(&self, payload: Multipart) -> ActixResult<HttpResponse> {
        validate::validate_excel(self, payload).await
    }

    // 格式说明
    pub async fn get_format(&self) -> ActixResult<HttpResponse> {
        format::get_format(self).await
    }

    // 下载模板
    pub async fn download_template(&self) -> ActixResult<HttpResponse> {
        template::download_template().await
    }
}

/// 结构性错误对应的业务错误码
pub(crate) fn structural_error_code(err: &RosterError) -> ErrorCode {
    match err {
        RosterError::UnsupportedExtension(_) => ErrorCode::FileTypeNotAllowed,
        RosterError::FileTooLarge(_) => ErrorCode::ImportFileTooLarge,
        _ => ErrorCode::ImportFileDataInvalid,
    }
}

/// 从 multipart 中读取 `file` 字段
///
/// 字段不存在时返回 `None`，内容为空的文件交给加载器判定。
pub(crate) async fn read_file_from_multipart(
    payload: &mut Multipart,
) -> Result<Option<(Vec<u8>, String)>, String> {
    let mut upload = None;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| format!("Error leyendo el campo: {e}"))?;

        if field.name().map(|n| n == "file").unwrap_or(false) {
            let file_name = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .unwrap_or("upload.xlsx")
                .to_string();

            let mut file_bytes = Vec::new();
            while let Some(chunk) = field.next().await {
                let data = chunk.map_err(|e| format!("Error leyendo los datos: {e}"))?;
                file_bytes.extend_from_slice(&data);
            }
            upload = Some((file_bytes, file_name));
        }
    }

    Ok(upload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_error_code() {
        assert_eq!(
            structural_error_code(&RosterError::unsupported_extension("txt")),
            ErrorCode::FileTypeNotAllowed
        );
        assert_eq!(
            structural_error_code(&RosterError::file_too_large("big")),
            ErrorCode::ImportFileTooLarge
        );
        assert_eq!(
            structural_error_code(&RosterError::empty_file("empty")),
            ErrorCode::ImportFileDataInvalid
        );
    }
}
