use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TableSessionQuery {
    pub table: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TableSessionResponse {
    pub table_id: i32,
    pub table_name: String,
    /// Send back as the `X-Table-Session` header when placing orders.
    pub token: String,
}
