//! 导入模板下载

use actix_web::{HttpResponse, Result as ActixResult};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use tracing::error;

use crate::importer::rows::ALL_SCHEMAS;

/// 生成四张表只含表头的空白工作簿
pub fn build_template() -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    for schema in ALL_SCHEMAS {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(schema.name)?;
        for (col, column) in schema.columns.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, column.header, &header_format)?;
            worksheet.set_column_width(col as u16, 22)?;
        }
    }

    workbook.save_to_buffer()
}

pub async fn download_template() -> ActixResult<HttpResponse> {
    let buffer = build_template().map_err(|e| {
        error!("XLSX 生成失败: {}", e);
        actix_web::error::ErrorInternalServerError(format!("XLSX 生成失败: {e}"))
    })?;

    Ok(HttpResponse::Ok()
        .content_type("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
        .insert_header((
            "Content-Disposition",
            "attachment; filename=\"plantilla_importacion.xlsx\"",
        ))
        .body(buffer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::{ImportOptions, ImportOrchestrator};

    #[test]
    fn test_template_passes_validation() {
        let buffer = build_template().unwrap();
        let report = ImportOrchestrator::new(ImportOptions::default())
            .validate(&buffer, "plantilla_importacion.xlsx")
            .unwrap();
        assert!(report.success);
        assert_eq!(
            report.valid_sheets,
            vec!["Grupos", "Entregas", "Estudiantes", "Equipos"]
        );
    }
}
