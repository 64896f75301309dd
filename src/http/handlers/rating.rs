use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    auth::AuthClaims,
    db::rating::{rating_status, submit_rating},
    models::{
        RatingEvent,
        rating::{RatingPayload, RatingStatus},
    },
    state::AppState,
};

pub async fn submit_rating_handler(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Json(payload): Json<RatingPayload>,
) -> Result<(StatusCode, Json<RatingEvent>), (StatusCode, String)> {
    let ctx = claims.context().map_err(|e| e.to_response())?;

    let event = submit_rating(
        &ctx,
        payload.rated_profile_id,
        payload.score,
        payload.comment,
        state.postgres.clone(),
    )
    .await
    .map_err(|e| {
        tracing::warn!("Rating by {} rejected: {}", ctx.account_id, e);
        e.to_response()
    })?;

    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn rating_status_handler(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(profile_id): Path<Uuid>,
) -> Result<Json<RatingStatus>, (StatusCode, String)> {
    let ctx = claims.context().map_err(|e| e.to_response())?;

    let status = rating_status(&ctx, profile_id, state.postgres.clone())
        .await
        .map_err(|e| e.to_response())?;

    Ok(Json(status))
}
