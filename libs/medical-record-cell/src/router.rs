use axum::{routing::get, Router};

use crate::handlers::*;
use crate::models::RecordState;

/// Mounted under `/api/doctor/medical-record`. Every route requires a
/// verified doctor's bearer token.
pub fn medical_record_routes(state: RecordState) -> Router {
    Router::new()
        .route("/", get(list_records).post(create_record))
        .route(
            "/{id}",
            get(get_record).put(update_record).delete(delete_record),
        )
        .with_state(state)
}
