use axum::{
    body::Bytes,
    extract::{Path, State},
    response::{IntoResponse, Json, Response},
    http::StatusCode,
};
use crate::models::{User, NameForm, HoursForm};
use crate::services::UserStore;
use crate::errors::{AppError, AppResult};
use tracing;

// Ids that are not positive integers can never match a record
fn parse_id(raw: &str) -> AppResult<u32> {
    raw.parse::<u32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::UserNotFound(raw.to_string()))
}

fn log_rejection(error: &AppError) {
    match error {
        AppError::UserNotFound(id) => tracing::info!("User {} not found", id),
        AppError::InvalidName => tracing::info!("Invalid name provided"),
        AppError::InvalidHours => tracing::info!("Invalid hoursToAdd value"),
    }
}

pub async fn list_users(State(store): State<UserStore>) -> Json<Vec<User>> {
    tracing::info!("GET /users - Fetching all users");
    Json(store.list_all())
}

pub async fn get_user(
    State(store): State<UserStore>,
    Path(id): Path<String>,
) -> AppResult<Json<User>> {
    tracing::info!("GET /users/{} - Fetching user", id);

    let user = parse_id(&id)
        .and_then(|id| store.get_by_id(id))
        .inspect_err(log_rejection)?;
    tracing::debug!("User found: {:?}", user);
    Ok(Json(user))
}

pub async fn create_user(
    State(store): State<UserStore>,
    body: Bytes,
) -> AppResult<Response> {
    tracing::info!("POST /users - Adding new user");

    let form = NameForm::from_body(&body);
    let user = store.create(form.name.as_deref()).inspect_err(log_rejection)?;

    tracing::info!("New user added: {:?}", user);
    Ok((StatusCode::CREATED, Json(user)).into_response())
}

pub async fn rename_user(
    State(store): State<UserStore>,
    Path(id): Path<String>,
    body: Bytes,
) -> AppResult<Json<User>> {
    tracing::info!("PUT /users/{} - Updating user", id);

    let form = NameForm::from_body(&body);
    let user = parse_id(&id)
        .and_then(|id| store.rename(id, form.name.as_deref()))
        .inspect_err(log_rejection)?;

    tracing::info!("User {} is now named {}", user.id, user.name);
    Ok(Json(user))
}

pub async fn add_hours(
    State(store): State<UserStore>,
    Path(id): Path<String>,
    body: Bytes,
) -> AppResult<Json<User>> {
    tracing::info!("PATCH /users/{} - Updating hours worked", id);

    let form = HoursForm::from_body(&body);
    let user = parse_id(&id)
        .and_then(|id| store.add_hours(id, form.hours_to_add))
        .inspect_err(log_rejection)?;

    tracing::info!("Total hours worked for user {}: {}", user.id, user.hours_worked);
    Ok(Json(user))
}

pub async fn delete_user(
    State(store): State<UserStore>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<User>>> {
    tracing::info!("DELETE /users/{} - Deleting user", id);

    let deleted = parse_id(&id)
        .and_then(|id| store.delete_by_id(id))
        .inspect_err(log_rejection)?;
    tracing::info!("User deleted: {:?}", deleted);
    Ok(Json(deleted))
}

pub async fn delete_all_users(State(store): State<UserStore>) -> Json<Vec<User>> {
    tracing::info!("DELETE /users - Deleting all users");
    Json(store.delete_all())
}
