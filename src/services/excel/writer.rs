use rust_xlsxwriter::Workbook;
use crate::error::AppError;
use crate::models::Table;

pub const OUTPUT_FILE_NAME: &str = "pagamentos_filtrados.xlsx";
pub const XLSX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub struct ExcelWriter;

impl ExcelWriter {
    /// Writes `table` to a single-sheet workbook, every cell as a string.
    pub fn write_to_buffer(&self, table: &Table) -> Result<Vec<u8>, AppError> {
        let start = std::time::Instant::now();
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        for (col, header) in table.headers.iter().enumerate() {
            worksheet.write_string(0, column_number(col)?, header)?;
        }

        for (row_idx, row) in table.rows.iter().enumerate() {
            let row_number = u32::try_from(row_idx + 1)
                .map_err(|_| AppError::Export(format!("row {} out of range", row_idx + 1)))?;
            for (col, value) in row.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                worksheet.write_string(row_number, column_number(col)?, value)?;
            }
        }

        let buffer = workbook.save_to_buffer()?;
        tracing::info!(
            "Wrote {} rows to workbook ({}KB) in {:?}",
            table.row_count(),
            buffer.len() / 1024,
            start.elapsed()
        );
        Ok(buffer)
    }
}

fn column_number(col: usize) -> Result<u16, AppError> {
    u16::try_from(col).map_err(|_| AppError::Export(format!("column {} out of range", col)))
}
