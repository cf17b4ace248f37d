use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde::{Deserialize, Serialize};

use crate::{
    api::error::ApiError,
    app::AppState,
    domain::{User, UserName, UserPassword, ValidationErrors},
    services,
};

pub const REGISTRATION_MESSAGE: &str = "Registration successful";

#[derive(Serialize, Deserialize)]
pub struct AuthRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub user: User,
}

#[derive(Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user: User,
    pub message: String,
}

fn validate_login(request: AuthRequest) -> Result<(String, String), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let username = request.username.filter(|u| !u.is_empty());
    if username.is_none() {
        errors.push("username", "Username is required.");
    }
    let password = request.password.filter(|p| !p.is_empty());
    if password.is_none() {
        errors.push("password", "Password is required.");
    }

    match (username, password) {
        (Some(username), Some(password)) => errors.finish((username, password)),
        _ => Err(errors),
    }
}

fn validate_registration(
    request: AuthRequest,
) -> Result<(UserName, UserPassword), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let username = UserName::parse(request.username.as_deref().unwrap_or_default())
        .map_err(|e| errors.push("username", e.to_string()))
        .ok();
    let password = UserPassword::parse(request.password.as_deref().unwrap_or_default())
        .map_err(|e| errors.push("password", e.to_string()))
        .ok();

    match (username, password) {
        (Some(username), Some(password)) => errors.finish((username, password)),
        _ => Err(errors),
    }
}

pub async fn login(
    State(app): State<AppState>,
    body: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(request) = body?;
    let (username, password) = validate_login(request)?;

    let outcome = services::login(
        &username,
        &password,
        &app.hasher,
        app.users.as_ref(),
        &app.tokens,
    )
    .await?;

    Ok(Json(LoginResponse {
        access_token: outcome.access_token,
        user: outcome.user,
    }))
}

pub async fn register(
    State(app): State<AppState>,
    body: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let Json(request) = body?;
    let (username, password) = validate_registration(request)?;

    let user = services::register_user(username, password, &app.hasher, app.users.as_ref()).await?;

    Ok(Json(RegisterResponse {
        user,
        message: REGISTRATION_MESSAGE.to_string(),
    }))
}
