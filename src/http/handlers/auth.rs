use axum::{Json, extract::State, http::StatusCode};

use crate::{
    auth::{AuthClaims, generate_jwt},
    db::{
        account::{authenticate, signup_company, signup_freelancer},
        company::get_company_by_account,
        freelancer::get_freelancer_by_account,
        rating::get_received_ratings,
    },
    errors::AppError,
    models::{
        Role,
        account::{AuthResponse, LoginPayload},
        company::CompanySignup,
        freelancer::FreelancerSignup,
        page::{Dashboard, ProfileView},
    },
    state::AppState,
};

pub async fn signup_freelancer_handler(
    State(state): State<AppState>,
    Json(payload): Json<FreelancerSignup>,
) -> Result<(StatusCode, Json<AuthResponse>), (StatusCode, String)> {
    let new = payload.validate().map_err(|e| {
        tracing::warn!("Rejected freelancer signup: {}", e);
        e.to_response()
    })?;

    let profile = signup_freelancer(new, state.postgres.clone())
        .await
        .map_err(|e| {
            tracing::error!("Error signing up freelancer: {}", e);
            e.to_response()
        })?;

    let token = generate_jwt(profile.account_id, Role::Freelancer, &state.jwt_secret)
        .map_err(|e| e.to_response())?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            account_id: profile.account_id,
            role: Role::Freelancer,
        }),
    ))
}

pub async fn signup_company_handler(
    State(state): State<AppState>,
    Json(payload): Json<CompanySignup>,
) -> Result<(StatusCode, Json<AuthResponse>), (StatusCode, String)> {
    let new = payload.validate().map_err(|e| {
        tracing::warn!("Rejected company signup: {}", e);
        e.to_response()
    })?;

    let profile = signup_company(new, state.postgres.clone())
        .await
        .map_err(|e| {
            tracing::error!("Error signing up company: {}", e);
            e.to_response()
        })?;

    let token = generate_jwt(profile.account_id, Role::Company, &state.jwt_secret)
        .map_err(|e| e.to_response())?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            account_id: profile.account_id,
            role: Role::Company,
        }),
    ))
}

pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    payload.validate().map_err(|e| e.to_response())?;

    let account = authenticate(&payload.email, &payload.password, state.postgres.clone())
        .await
        .map_err(|e| e.to_response())?;

    let token =
        generate_jwt(account.id, account.role, &state.jwt_secret).map_err(|e| e.to_response())?;

    tracing::info!("Account {} logged in", account.id);
    Ok(Json(AuthResponse {
        token,
        account_id: account.id,
        role: account.role,
    }))
}

pub async fn me_handler(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
) -> Result<Json<Dashboard>, (StatusCode, String)> {
    let ctx = claims.context().map_err(|e| e.to_response())?;

    let dashboard = async {
        let (profile, profile_id) = match ctx.role {
            Role::Freelancer => {
                let profile =
                    get_freelancer_by_account(ctx.account_id, state.postgres.clone()).await?;
                let id = profile.id;
                (ProfileView::Freelancer(profile), id)
            }
            Role::Company => {
                let profile =
                    get_company_by_account(ctx.account_id, state.postgres.clone()).await?;
                let id = profile.id;
                (ProfileView::Company(profile), id)
            }
        };
        let ratings = get_received_ratings(profile_id, ctx.role, state.postgres.clone()).await?;

        Ok::<_, AppError>(Dashboard {
            role: ctx.role,
            profile,
            ratings,
        })
    }
    .await
    .map_err(|e| {
        tracing::error!("Error loading dashboard for {}: {}", ctx.account_id, e);
        e.to_response()
    })?;

    Ok(Json(dashboard))
}
