//! Health check endpoint.

use std::collections::HashMap;

use axum::{extract::State, Json};

use crate::database::Service;
use crate::error::AppError;
use crate::server::AppState;

/// `GET /health`
///
/// Returns the facade's health payload. A failed check answers 503 and asks
/// the process to shut down; a service whose database is gone must not keep
/// serving.
pub async fn health<S>(
    State(state): State<AppState<S>>,
) -> Result<Json<HashMap<String, String>>, AppError>
where
    S: Service + 'static,
{
    match state.database.health().await {
        Ok(payload) => Ok(Json(payload)),
        Err(e) => {
            if e.is_fatal() {
                state.report_fatal(&e);
            }
            Err(AppError::Database(e))
        }
    }
}
