use super::utils::*;
use std::io::Cursor;
use bytes::Bytes;
use calamine::{open_workbook_auto_from_rs, Reader};
use crate::error::AppError;
use crate::models::Table;

/// Reads the first worksheet of an `.xls`/`.xlsx` upload into a text [`Table`].
pub struct ExcelReader;

impl ExcelReader {
    pub fn read_first_sheet(&self, file_data: Bytes) -> Result<Table, AppError> {
        let start = std::time::Instant::now();
        tracing::info!("Opening workbook ({}KB)", file_data.len() / 1024);

        let cursor = Cursor::new(file_data);
        let mut workbook = open_workbook_auto_from_rs(cursor)
            .map_err(|e| {
                tracing::error!("Failed to open Excel file: {}", e);
                AppError::Load(e.to_string())
            })?;

        let sheet_names = workbook.sheet_names().to_vec();
        tracing::info!("Found {} sheets: {:?}", sheet_names.len(), sheet_names);

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| AppError::Load("nenhuma aba encontrada".to_string()))?
            .map_err(|e| {
                tracing::error!("Failed to read worksheet: {}", e);
                AppError::Load(e.to_string())
            })?;

        let mut rows = range.rows();
        let header_row = rows
            .next()
            .filter(|row| !row.is_empty())
            .ok_or_else(|| AppError::Load("a primeira aba não tem linha de cabeçalho".to_string()))?;

        let raw_headers: Vec<String> = header_row.iter().map(cell_to_text).collect();
        let headers = clean_headers(raw_headers.iter().map(String::as_str));

        let data_rows: Vec<Vec<String>> = rows
            .map(|row| row.iter().map(|cell| cell_to_text(cell).trim().to_string()).collect())
            .collect();

        let table = Table::new(headers, data_rows);
        tracing::info!(
            "Read sheet {:?}: {} rows, {} columns in {:?}",
            sheet_names.first(),
            table.row_count(),
            table.column_count(),
            start.elapsed()
        );

        Ok(table)
    }
}
