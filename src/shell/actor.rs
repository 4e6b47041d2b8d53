// Resolves the acting user from the identity header set by the upstream
// identity provider. The header is trusted; the role comes from the directory.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use uuid::Uuid;

use crate::modules::directory::adapters::outbound::directory::Directory;
use crate::shared::core::actor::Actor;
use crate::shell::http::ACTOR_HEADER;
use crate::shell::state::AppState;

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "unauthorized", "message": message })),
    )
        .into_response()
}

/// `None` when the header is absent, malformed or names no known user.
pub async fn resolve_actor(
    directory: &dyn Directory,
    header: Option<&str>,
) -> anyhow::Result<Option<Actor>> {
    let Some(user_id) = header.and_then(|raw| Uuid::parse_str(raw.trim()).ok()) else {
        return Ok(None);
    };
    Ok(directory.find_user(user_id).await?.as_ref().map(Actor::from))
}

impl FromRequestParts<AppState> for Actor {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(ACTOR_HEADER)
            .and_then(|value| value.to_str().ok());

        match resolve_actor(state.directory.as_ref(), header).await {
            Ok(Some(actor)) => Ok(actor),
            Ok(None) => Err(unauthorized("unknown or missing acting user")),
            Err(err) => {
                tracing::error!(error = %err, "failed to resolve acting user");
                Err(crate::shared::core::errors::ApplicationError::from(err).into_response())
            }
        }
    }
}
