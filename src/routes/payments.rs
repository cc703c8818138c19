use axum::{
    extract::{Multipart, State},
    http::{header, HeaderMap, HeaderValue, Method},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use bytes::Bytes;
use serde::Serialize;
use std::sync::Arc;
use crate::{
    AppState,
    error::AppError,
    models::{FilterOutcome, FilterStats},
    services::{
        excel::{utils::is_supported_file, ExcelReader, ExcelWriter, OUTPUT_FILE_NAME, XLSX_MIME_TYPE},
        filter::PaymentFilter,
    },
};
use tower_http::cors::{CorsLayer, Any};

const WARNING_HEADER: &str = "x-filter-warning";

pub fn routes() -> Router<Arc<AppState>> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .expose_headers([header::CONTENT_DISPOSITION, header::HeaderName::from_static(WARNING_HEADER)])
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/payments/preview", post(preview_payments))
        .route("/payments/filter", post(download_filtered))
        .layer(cors)
}

#[derive(Debug, Default)]
struct UploadForm {
    username: String,
    password: String,
    file_name: Option<String>,
    file_data: Option<Bytes>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    file_name: String,
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    row_count: usize,
    warnings: Vec<String>,
    stats: FilterStats,
}

async fn read_upload(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "username" => form.username = field.text().await?,
            "password" => form.password = field.text().await?,
            "file" => {
                form.file_name = field.file_name().map(str::to_string);
                form.file_data = Some(field.bytes().await?);
            }
            other => tracing::debug!("Ignoring unexpected form field: {}", other),
        }
    }

    Ok(form)
}

/// Checks credentials and the upload, then runs the reader and the filter
/// on a blocking thread. With `export` set, the filtered table is also
/// written to an `.xlsx` buffer.
async fn process_upload(
    state: &AppState,
    multipart: Multipart,
    export: bool,
) -> Result<(String, FilterOutcome, Option<Vec<u8>>), AppError> {
    let start = std::time::Instant::now();
    let form = read_upload(multipart).await?;

    if form.username.is_empty() || form.password.is_empty() {
        return Err(AppError::MissingCredentials);
    }
    if !state.authenticator.authenticate(&form.username, &form.password) {
        tracing::warn!("Rejected credentials for user: {}", form.username);
        return Err(AppError::InvalidCredentials);
    }

    let file_data = form.file_data
        .filter(|data| !data.is_empty())
        .ok_or_else(|| AppError::InvalidInput("Nenhum arquivo enviado.".to_string()))?;
    let file_name = form.file_name.unwrap_or_default();
    if !is_supported_file(&file_name) {
        tracing::error!("Unsupported file type: {}", file_name);
        return Err(AppError::InvalidInput(
            "Apenas arquivos .xls ou .xlsx são aceitos.".to_string(),
        ));
    }

    tracing::info!(
        "Processing upload {} ({}KB) for user: {}",
        file_name,
        file_data.len() / 1024,
        form.username
    );

    let (outcome, workbook) = tokio::task::spawn_blocking(move || {
        let table = ExcelReader.read_first_sheet(file_data)?;
        let outcome = PaymentFilter::default().apply(table)?;
        let workbook = if export {
            Some(ExcelWriter.write_to_buffer(&outcome.table)?)
        } else {
            None
        };
        Ok::<_, AppError>((outcome, workbook))
    })
    .await??;

    tracing::info!("Upload {} processed in {:?}", file_name, start.elapsed());
    Ok((file_name, outcome, workbook))
}

async fn preview_payments(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<PreviewResponse>, AppError> {
    let (file_name, outcome, _) = process_upload(&state, multipart, false).await?;
    let FilterOutcome { table, warnings, stats } = outcome;

    Ok(Json(PreviewResponse {
        file_name,
        row_count: table.row_count(),
        columns: table.headers,
        rows: table.rows,
        warnings: warnings.iter().map(ToString::to_string).collect(),
        stats,
    }))
}

async fn download_filtered(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let (_, outcome, workbook) = process_upload(&state, multipart, true).await?;
    let workbook = workbook
        .ok_or_else(|| AppError::Unexpected("workbook was not generated".to_string()))?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(XLSX_MIME_TYPE));
    let disposition = format!("attachment; filename=\"{}\"", OUTPUT_FILE_NAME);
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .map_err(|e| AppError::Unexpected(e.to_string()))?,
    );
    for warning in &outcome.warnings {
        headers.append(WARNING_HEADER, HeaderValue::from_static(warning.code()));
    }

    Ok((headers, workbook).into_response())
}
