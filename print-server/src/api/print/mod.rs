//! Print API module
//!
//! | Path | Method | Purpose |
//! |------|--------|---------|
//! | /print | POST | dispatch a payload to N printers |
//! | /print/preview | POST | render the payload as HTML |
//! | /print/preview | GET | static browser testing tool |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/print", post(handler::print))
        .route(
            "/print/preview",
            post(handler::preview).get(handler::preview_page),
        )
}
