use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use ftradar_core::RadarError;

#[expect(
    clippy::needless_pass_by_value,
    reason = "handlers naturally own error values from `Result` and pass them through"
)]
pub fn radar_error_response(err: RadarError, operation: &str) -> Response {
    let status = status_for_radar_error(&err);
    if status.is_server_error() {
        tracing::error!(operation, error = %err, "request failed");
    } else {
        tracing::debug!(operation, error = %err, "request rejected");
    }
    (status, Json(err.to_payload(operation))).into_response()
}

fn status_for_radar_error(err: &RadarError) -> StatusCode {
    match err {
        RadarError::InvalidCategory(_)
        | RadarError::InvalidRegion(_)
        | RadarError::InvalidChangeType(_)
        | RadarError::InvalidTimestamp(_)
        | RadarError::Validation(_) => StatusCode::BAD_REQUEST,
        RadarError::PermissionDenied(_) => StatusCode::FORBIDDEN,
        RadarError::NotFound(_) => StatusCode::NOT_FOUND,
        RadarError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
            StatusCode::NOT_FOUND
        }
        RadarError::Io(_)
        | RadarError::Json(_)
        | RadarError::Sqlite(_)
        | RadarError::Yaml(_)
        | RadarError::Mail(_)
        | RadarError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
