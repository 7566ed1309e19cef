//! Upload and health handlers

use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::{AppError, AppState, MAX_UPLOAD_SIZE};
use saldo_core::{
    advisor::{annotate_summaries, AdvisorBackend},
    aggregate::aggregate_cards,
    models::CardSummary,
    sheet::extract_rows,
};

/// Default installment count when the form field is absent
const DEFAULT_INSTALLMENTS: &str = "1";

/// POST /upload - Summarize an uploaded installment statement
///
/// Expects multipart form with:
/// - file: statement workbook (required, max 10MB)
/// - cuotasPendientes: requested installment count (optional, default "1")
///
/// Responds with one JSON object per detected card, in the order the card
/// markers were first encountered.
pub async fn upload_statement(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Vec<CardSummary>>, AppError> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut cuotas: Option<String> = None;

    // Extract fields from multipart form
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(&format!("Failed to read form field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| AppError::bad_request("Failed to read file data"))?;

                if bytes.len() > MAX_UPLOAD_SIZE {
                    return Err(AppError::bad_request(&format!(
                        "File too large. Maximum size is {} MB",
                        MAX_UPLOAD_SIZE / 1024 / 1024
                    )));
                }

                file_data = Some(bytes.to_vec());
            }
            "cuotasPendientes" => {
                let value = field
                    .text()
                    .await
                    .map_err(|_| AppError::bad_request("Failed to read cuotasPendientes"))?;
                if !value.is_empty() {
                    cuotas = Some(value);
                }
            }
            _ => {}
        }
    }

    let file_data = file_data.ok_or_else(|| AppError::bad_request("Missing file field"))?;
    let cuotas = cuotas.unwrap_or_else(|| DEFAULT_INSTALLMENTS.to_string());

    // Decode and aggregate; failures here are data-integrity violations
    // and surface as a generic server error
    let rows = extract_rows(&file_data)?;
    let mut summaries = aggregate_cards(&rows, &cuotas)?;

    info!(
        rows = rows.len(),
        cards = summaries.len(),
        cuotas = %cuotas,
        "Aggregated statement upload"
    );

    annotate_summaries(&state.advisor, &mut summaries).await;

    Ok(Json(summaries))
}

/// Health response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub advisor: AdvisorHealth,
}

/// Advisor backend status
#[derive(Serialize)]
pub struct AdvisorHealth {
    pub host: String,
    pub model: String,
    pub healthy: bool,
}

/// GET /health - Service and advisor backend status
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let healthy = state.advisor.health_check().await;

    Json(HealthResponse {
        status: "ok",
        advisor: AdvisorHealth {
            host: state.advisor.host().to_string(),
            model: state.advisor.model().to_string(),
            healthy,
        },
    })
}
