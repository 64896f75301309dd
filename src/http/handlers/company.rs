use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    auth::AuthClaims,
    db::{
        company::{get_company, set_logo, update_company},
        rating::get_received_ratings,
    },
    http::handlers::upload::store_upload,
    models::{
        CompanyProfile, Role,
        company::CompanyUpdate,
        page::{ProfilePage, UploadResponse},
    },
    state::AppState,
    uploads::UploadKind,
};

pub async fn get_company_handler(
    State(state): State<AppState>,
    Path(company_id): Path<Uuid>,
) -> Result<Json<ProfilePage<CompanyProfile>>, (StatusCode, String)> {
    let profile = get_company(company_id, state.postgres.clone())
        .await
        .map_err(|e| e.to_response())?;

    let ratings = get_received_ratings(profile.id, Role::Company, state.postgres.clone())
        .await
        .map_err(|e| {
            tracing::error!("Error retrieving ratings of {}: {}", company_id, e);
            e.to_response()
        })?;

    Ok(Json(ProfilePage { profile, ratings }))
}

pub async fn update_company_handler(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Json(payload): Json<CompanyUpdate>,
) -> Result<Json<CompanyProfile>, (StatusCode, String)> {
    let ctx = claims.context().map_err(|e| e.to_response())?;
    ctx.require_role(Role::Company)
        .map_err(|e| e.to_response())?;

    let details = payload.validate().map_err(|e| e.to_response())?;

    let profile = update_company(&ctx, details, &payload.password, state.postgres.clone())
        .await
        .map_err(|e| {
            tracing::warn!("Profile update for {} failed: {}", ctx.account_id, e);
            e.to_response()
        })?;

    Ok(Json(profile))
}

pub async fn upload_logo_handler(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, (StatusCode, String)> {
    let ctx = claims.context().map_err(|e| e.to_response())?;
    ctx.require_role(Role::Company)
        .map_err(|e| e.to_response())?;

    let upload = store_upload(&state, UploadKind::CompanyLogo, multipart)
        .await
        .map_err(|e| {
            tracing::warn!("Rejected logo from {}: {}", ctx.account_id, e);
            e.to_response()
        })?;

    set_logo(ctx.account_id, &upload.file_name, state.postgres.clone())
        .await
        .map_err(|e| e.to_response())?;

    Ok(Json(upload))
}
