use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    auth::AuthClaims,
    db::{
        freelancer::{
            get_freelancer, search_freelancers, set_profile_picture, set_resume_file,
            update_freelancer,
        },
        rating::get_received_ratings,
    },
    http::handlers::upload::store_upload,
    models::{
        FreelancerProfile, Profession, Role,
        freelancer::FreelancerUpdate,
        page::{ProfilePage, UploadResponse},
        search::{SearchFilter, SearchQuery},
    },
    state::AppState,
    uploads::UploadKind,
};

pub async fn list_professions_handler() -> Json<Vec<&'static str>> {
    Json(Profession::ALL.iter().map(|p| p.label()).collect())
}

pub async fn search_freelancers_handler(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<FreelancerProfile>>, (StatusCode, String)> {
    let filter = SearchFilter::try_from(query).map_err(|e| e.to_response())?;

    let freelancers = search_freelancers(&filter, state.postgres.clone())
        .await
        .map_err(|e| {
            tracing::error!("Error searching freelancers: {}", e);
            e.to_response()
        })?;

    Ok(Json(freelancers))
}

pub async fn get_freelancer_handler(
    State(state): State<AppState>,
    Path(freelancer_id): Path<Uuid>,
) -> Result<Json<ProfilePage<FreelancerProfile>>, (StatusCode, String)> {
    let profile = get_freelancer(freelancer_id, state.postgres.clone())
        .await
        .map_err(|e| e.to_response())?;

    let ratings = get_received_ratings(profile.id, Role::Freelancer, state.postgres.clone())
        .await
        .map_err(|e| {
            tracing::error!("Error retrieving ratings of {}: {}", freelancer_id, e);
            e.to_response()
        })?;

    Ok(Json(ProfilePage { profile, ratings }))
}

pub async fn update_freelancer_handler(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Json(payload): Json<FreelancerUpdate>,
) -> Result<Json<FreelancerProfile>, (StatusCode, String)> {
    let ctx = claims.context().map_err(|e| e.to_response())?;
    ctx.require_role(Role::Freelancer)
        .map_err(|e| e.to_response())?;

    let details = payload.validate().map_err(|e| e.to_response())?;

    let profile = update_freelancer(&ctx, details, &payload.password, state.postgres.clone())
        .await
        .map_err(|e| {
            tracing::warn!("Profile update for {} failed: {}", ctx.account_id, e);
            e.to_response()
        })?;

    Ok(Json(profile))
}

pub async fn upload_profile_picture_handler(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, (StatusCode, String)> {
    let ctx = claims.context().map_err(|e| e.to_response())?;
    ctx.require_role(Role::Freelancer)
        .map_err(|e| e.to_response())?;

    let upload = store_upload(&state, UploadKind::ProfilePicture, multipart)
        .await
        .map_err(|e| {
            tracing::warn!("Rejected profile picture from {}: {}", ctx.account_id, e);
            e.to_response()
        })?;

    set_profile_picture(ctx.account_id, &upload.file_name, state.postgres.clone())
        .await
        .map_err(|e| e.to_response())?;

    Ok(Json(upload))
}

pub async fn upload_resume_handler(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, (StatusCode, String)> {
    let ctx = claims.context().map_err(|e| e.to_response())?;
    ctx.require_role(Role::Freelancer)
        .map_err(|e| e.to_response())?;

    let upload = store_upload(&state, UploadKind::Resume, multipart)
        .await
        .map_err(|e| {
            tracing::warn!("Rejected resume from {}: {}", ctx.account_id, e);
            e.to_response()
        })?;

    set_resume_file(ctx.account_id, &upload.file_name, state.postgres.clone())
        .await
        .map_err(|e| e.to_response())?;

    Ok(Json(upload))
}
