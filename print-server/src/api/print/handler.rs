//! Print API handlers

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
};
use serde::{Deserialize, Serialize};

use posr_printer::{DriverConfig, EscposOptions};
use shared::{PartialReceiptConfig, ReceiptConfig};

use crate::core::AppState;
use crate::dispatch::{DispatchResult, PrinterJob};
use crate::receipt::{PrintData, build_document};
use crate::render::{HtmlRenderer, escape_html};
use crate::utils::{AppError, AppResult};

/// One printer entry in the request: driver fields flattened alongside
/// the optional ESC/POS options
#[derive(Debug, Clone, Deserialize)]
pub struct PrinterEntry {
    #[serde(flatten)]
    pub driver: DriverConfig,
    #[serde(default, rename = "escposOptions")]
    pub escpos_options: EscposOptions,
}

/// POST /print request body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PrintRequest {
    pub printers: Vec<PrinterEntry>,
    pub data: Option<PrintData>,
    pub config: Option<PartialReceiptConfig>,
}

/// POST /print response body
#[derive(Debug, Serialize)]
pub struct PrintResponse {
    pub success: bool,
    pub results: Vec<DispatchResult>,
}

/// POST /print - dispatch one payload to every configured printer
///
/// 200 when every job succeeded, 207 when any failed, 400 only for a
/// malformed request shape.
pub async fn print(
    State(state): State<AppState>,
    Json(request): Json<PrintRequest>,
) -> AppResult<impl IntoResponse> {
    if request.printers.is_empty() {
        return Err(AppError::RequestMalformed(
            "printers missing or empty".to_string(),
        ));
    }
    let data = request
        .data
        .ok_or_else(|| AppError::RequestMalformed("data missing".to_string()))?;

    let config = ReceiptConfig::normalize(&request.config.unwrap_or_default());

    let jobs: Vec<PrinterJob> = request
        .printers
        .into_iter()
        .enumerate()
        .map(|(index, entry)| PrinterJob {
            index,
            driver: entry.driver,
            escpos: entry.escpos_options,
        })
        .collect();

    let results = state.dispatcher.dispatch(&jobs, &data, &config).await;
    let success = results.iter().all(|r| r.ok);

    let status = if success {
        StatusCode::OK
    } else {
        StatusCode::MULTI_STATUS
    };

    Ok((status, Json(PrintResponse { success, results })))
}

/// POST /print/preview - render the payload as HTML
///
/// The browser is the only "device" on this path, so failures surface
/// directly as a 400 with an escaped HTML error body.
pub async fn preview(
    State(_state): State<AppState>,
    Json(request): Json<PrintRequest>,
) -> impl IntoResponse {
    let config = ReceiptConfig::normalize(&request.config.unwrap_or_default());

    let Some(data) = request.data else {
        return preview_error("data missing");
    };

    match build_document(&data, &config) {
        Ok(document) => {
            let html = HtmlRenderer::new(&config).render(&document);
            (StatusCode::OK, Html(html))
        }
        Err(e) => preview_error(&e.to_string()),
    }
}

fn preview_error(message: &str) -> (StatusCode, Html<String>) {
    let body = format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <title>Preview failed</title></head>\
         <body><h1>Preview failed</h1><p>{}</p></body></html>",
        escape_html(message)
    );
    (StatusCode::BAD_REQUEST, Html(body))
}

/// GET /print/preview - static browser testing tool
pub async fn preview_page() -> Html<&'static str> {
    Html(include_str!("../../../static/preview.html"))
}
