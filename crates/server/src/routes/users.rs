//! User directory JSON API handlers.
//!
//! Handlers only translate between HTTP and [`UserService`](crate::services::UserService);
//! every rule lives in the service. Extractor rejections are routed through
//! [`AppError`](crate::error::AppError) so malformed input gets the same `{"error": ...}` body as
//! domain failures.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
};
use serde::{Deserialize, Deserializer, Serialize};

use user_directory_core::{User, UserDetails, UserId};

use crate::error::Result;
use crate::services::ImportSummary;
use crate::state::AppState;

/// Plain status message body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Query string for `GET /api/users/search`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
}

/// Query string for `GET /api/users/find`.
#[derive(Debug, Deserialize)]
pub struct FindParams {
    /// An empty `id=` counts as absent.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub id: Option<UserId>,
    pub email: Option<String>,
}

fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<UserId>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<i64>()
            .map(|id| Some(UserId::new(id)))
            .map_err(serde::de::Error::custom),
    }
}

/// Body for `PUT /api/users/{id}`. The `id` may be omitted; it is ignored either way.
#[derive(Debug, Deserialize)]
pub struct UserUpdate {
    #[serde(default)]
    pub id: Option<UserId>,
    #[serde(flatten)]
    pub details: UserDetails,
}

/// `POST /api/users/import`
pub async fn import(State(state): State<AppState>) -> Result<Json<ImportSummary>> {
    let summary = state.users().import_from_source().await?;
    Ok(Json(summary))
}

/// `GET /api/users`
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    Ok(Json(state.users().list_all().await?))
}

/// `GET /api/users/search?query=`
pub async fn search(
    State(state): State<AppState>,
    params: std::result::Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<User>>> {
    let Query(params) = params?;
    Ok(Json(state.users().search(&params.query).await?))
}

/// `GET /api/users/find?id=&email=`
pub async fn find(
    State(state): State<AppState>,
    params: std::result::Result<Query<FindParams>, QueryRejection>,
) -> Result<Json<User>> {
    let Query(params) = params?;
    let user = state
        .users()
        .find_by_id_or_email(params.id, params.email.as_deref())
        .await?;
    Ok(Json(user))
}

/// `PUT /api/users/{id}`
pub async fn update(
    State(state): State<AppState>,
    id: std::result::Result<Path<UserId>, PathRejection>,
    body: std::result::Result<Json<UserUpdate>, JsonRejection>,
) -> Result<Json<User>> {
    let Path(id) = id?;
    let Json(body) = body?;

    let replacement = User::new(body.id.unwrap_or(id), body.details);
    Ok(Json(state.users().update(id, replacement).await?))
}

/// `DELETE /api/users/{id}`
pub async fn delete(
    State(state): State<AppState>,
    id: std::result::Result<Path<UserId>, PathRejection>,
) -> Result<Json<MessageResponse>> {
    let Path(id) = id?;
    let message = state.users().delete(id).await?;
    Ok(Json(MessageResponse { message }))
}
