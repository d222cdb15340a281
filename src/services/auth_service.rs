use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};
use sea_orm::EntityTrait;

use crate::{
    dto::auth::{LoginRequest, LoginResponse, TableSessionQuery, TableSessionResponse},
    entity::dining_tables::Entity as DiningTables,
    error::{AppError, AppResult},
    middleware::auth::{issue_admin_token, issue_table_token},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Exchange the admin password for a session token.
pub async fn admin_login(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let parsed_hash = PasswordHash::new(&state.admin_password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    if Argon2::default()
        .verify_password(payload.password.as_bytes(), &parsed_hash)
        .is_err()
    {
        tracing::warn!("admin login rejected");
        return Err(AppError::bad_request("Wrong password"));
    }

    let token = issue_admin_token(&state.config.session_secret)?;
    tracing::info!("admin logged in");

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse { token },
        Some(Meta::empty()),
    ))
}

/// Remember the table a customer scanned, as a signed token.
pub async fn open_table_session(
    state: &AppState,
    query: TableSessionQuery,
) -> AppResult<ApiResponse<TableSessionResponse>> {
    let table = DiningTables::find_by_id(query.table)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let token = issue_table_token(&state.config.session_secret, table.id)?;

    Ok(ApiResponse::success(
        "Table selected",
        TableSessionResponse {
            table_id: table.id,
            table_name: table.name,
            token,
        },
        Some(Meta::empty()),
    ))
}
