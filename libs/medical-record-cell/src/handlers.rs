use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_models::error::AppError;
use shared_utils::extractor::{ApiJson, CurrentDoctor};

use crate::models::{
    CreateRecordRequest, ListRecordsQuery, RecordState, RecordSummary, UpdateRecordRequest,
};
use crate::services::MedicalRecordService;

fn parse_record_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|_| AppError::BadRequest("Invalid record ID".to_string()))
}

pub async fn create_record(
    State(state): State<RecordState>,
    CurrentDoctor(doctor): CurrentDoctor,
    ApiJson(request): ApiJson<CreateRecordRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let record = MedicalRecordService::new(&state).create(&doctor, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "code": 201,
            "error": false,
            "message": "Medical record created successfully",
            "data": record
        })),
    ))
}

pub async fn list_records(
    State(state): State<RecordState>,
    CurrentDoctor(doctor): CurrentDoctor,
    Query(query): Query<ListRecordsQuery>,
) -> Result<Json<Value>, AppError> {
    let page = MedicalRecordService::new(&state).list(&doctor, &query).await?;

    Ok(Json(json!({
        "code": 200,
        "error": false,
        "message": "Medical records fetched successfully",
        "data": page.records,
        "totalRecords": page.total,
        "page": query.page(),
        "limit": query.limit()
    })))
}

pub async fn get_record(
    State(state): State<RecordState>,
    CurrentDoctor(doctor): CurrentDoctor,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_record_id(&id)?;
    let record = MedicalRecordService::new(&state).get(&doctor, id).await?;

    Ok(Json(json!({
        "code": 200,
        "error": false,
        "message": "Medical record fetched successfully",
        "data": record
    })))
}

pub async fn update_record(
    State(state): State<RecordState>,
    CurrentDoctor(doctor): CurrentDoctor,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateRecordRequest>,
) -> Result<Json<Value>, AppError> {
    let id = parse_record_id(&id)?;
    let record = MedicalRecordService::new(&state)
        .update(&doctor, id, request)
        .await?;

    Ok(Json(json!({
        "code": 200,
        "error": false,
        "message": "Medical record updated successfully",
        "data": RecordSummary::from(record)
    })))
}

pub async fn delete_record(
    State(state): State<RecordState>,
    CurrentDoctor(doctor): CurrentDoctor,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_record_id(&id)?;
    MedicalRecordService::new(&state).delete(&doctor, id).await?;

    Ok(Json(json!({
        "code": 200,
        "error": false,
        "message": "Medical record deleted successfully"
    })))
}
