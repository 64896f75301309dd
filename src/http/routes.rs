use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
};

use crate::{
    http::handlers::{
        get_company_handler, get_freelancer_handler, list_professions_handler, login_handler,
        me_handler, rating_status_handler, search_freelancers_handler, signup_company_handler,
        signup_freelancer_handler, submit_rating_handler, update_company_handler,
        update_freelancer_handler, upload_logo_handler, upload_profile_picture_handler,
        upload_resume_handler,
    },
    middleware::{create_auth_rate_limiter, rate_limit_middleware},
    state::AppState,
    uploads::MAX_UPLOAD_BYTES,
};

// Room above the file limit so oversized files reach the validator and get a
// descriptive message instead of a bare 413.
const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES * 2;

pub fn create_http_routes(state: AppState) -> Router {
    let auth_rate_limiter = create_auth_rate_limiter();

    let auth_routes = Router::new()
        .route("/signup/freelancer", post(signup_freelancer_handler))
        .route("/signup/company", post(signup_company_handler))
        .route("/login", post(login_handler))
        .layer(axum_middleware::from_fn(move |req, next| {
            rate_limit_middleware(auth_rate_limiter.clone(), req, next)
        }));

    let upload_routes = Router::new()
        .route(
            "/freelancers/me/picture",
            post(upload_profile_picture_handler),
        )
        .route("/freelancers/me/resume", post(upload_resume_handler))
        .route("/companies/me/logo", post(upload_logo_handler))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT));

    Router::new()
        .nest("/auth", auth_routes)
        .merge(upload_routes)
        .route("/me", get(me_handler))
        .route("/professions", get(list_professions_handler))
        .route("/freelancers/search", get(search_freelancers_handler))
        .route("/freelancers/me", put(update_freelancer_handler))
        .route("/freelancers/{freelancer_id}", get(get_freelancer_handler))
        .route("/companies/me", put(update_company_handler))
        .route("/companies/{company_id}", get(get_company_handler))
        .route("/ratings", post(submit_rating_handler))
        .route("/ratings/status/{profile_id}", get(rating_status_handler))
        .with_state(state)
}
