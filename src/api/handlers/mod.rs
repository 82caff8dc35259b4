use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::db::{Database, HireError};
use crate::models::*;
use crate::seed;

const MIN_SEED_COUNT: u32 = 1;
const MAX_SEED_COUNT: u32 = 1000;

// ============================================================
// Error Handling
// ============================================================

/// Log an internal error and return a sanitized response to the client.
/// The full error is logged server-side for debugging, but clients only
/// see a generic message to avoid leaking internal details.
fn internal_error(e: impl std::fmt::Display) -> (StatusCode, String) {
    tracing::error!("Internal error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal server error".to_string(),
    )
}

/// Map a hire failure: validation and conflict rejections are the caller's
/// to resolve, anything else is a server fault.
fn hire_error(e: HireError) -> (StatusCode, String) {
    match e {
        HireError::Validation(msg) | HireError::Conflict(msg) => {
            tracing::warn!("Hire rejected: {}", msg);
            (StatusCode::BAD_REQUEST, msg)
        }
        HireError::Database(e) => internal_error(e),
    }
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Employees
// ============================================================

pub async fn hire_employee(
    State(db): State<Database>,
    Json(input): Json<HireEmployeeInput>,
) -> Result<(StatusCode, Json<EmployeeView>), (StatusCode, String)> {
    // The public surface requires a leader; root hires happen through seeding.
    if input.leader_id.is_none() {
        tracing::warn!("Hire rejected: no leader specified");
        return Err((StatusCode::BAD_REQUEST, "No leader specified".to_string()));
    }

    db.hire(input)
        .map(|emp| (StatusCode::CREATED, Json(emp.into())))
        .map_err(hire_error)
}

pub async fn fire_employee(
    State(db): State<Database>,
    Path(id): Path<i64>,
    Json(input): Json<FireEmployeeInput>,
) -> Result<Json<bool>, (StatusCode, String)> {
    db.get_employee(id)
        .map_err(internal_error)?
        .ok_or((StatusCode::NOT_FOUND, "Employee not found".to_string()))?;

    db.fire(id, input.new_leader_id)
        .map(Json)
        .map_err(internal_error)
}

pub async fn delete_employee(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Json<bool>, (StatusCode, String)> {
    db.get_employee(id)
        .map_err(internal_error)?
        .ok_or((StatusCode::NOT_FOUND, "Employee not found".to_string()))?;

    db.delete(id).map(Json).map_err(internal_error)
}

pub async fn list_employees(
    State(db): State<Database>,
) -> Result<Json<Vec<EmployeeView>>, (StatusCode, String)> {
    let employees = db.get_all().map_err(internal_error)?;
    Ok(Json(employees.into_iter().map(Into::into).collect()))
}

pub async fn list_employed(
    State(db): State<Database>,
) -> Result<Json<Vec<EmployeeView>>, (StatusCode, String)> {
    let employees = db.get_all_employed().map_err(internal_error)?;
    Ok(Json(employees.into_iter().map(Into::into).collect()))
}

pub async fn get_employee(
    State(db): State<Database>,
    Path(id): Path<i64>,
) -> Result<Json<EmployeeView>, (StatusCode, String)> {
    db.get_employee(id)
        .map_err(internal_error)?
        .map(|emp| Json(emp.into()))
        .ok_or((StatusCode::NOT_FOUND, "Employee not found".to_string()))
}

// ============================================================
// Test data seeding
// ============================================================

/// Input for the bulk test seed.
#[derive(Debug, Deserialize)]
pub struct SeedInput {
    /// Number of rank-and-file employees to generate, on top of the
    /// director/manager/team-lead trio.
    pub count: u32,
}

pub async fn seed_employees(
    State(db): State<Database>,
    Json(input): Json<SeedInput>,
) -> Result<Json<Vec<EmployeeView>>, (StatusCode, String)> {
    if !(MIN_SEED_COUNT..=MAX_SEED_COUNT).contains(&input.count) {
        let msg = format!(
            "Count {} must be within [{}:{}]",
            input.count, MIN_SEED_COUNT, MAX_SEED_COUNT
        );
        tracing::warn!("{}", msg);
        return Err((StatusCode::BAD_REQUEST, msg));
    }

    seed::seed_test_data(&db, input.count)
        .map(|emps| Json(emps.into_iter().map(Into::into).collect()))
        .map_err(internal_error)
}
