//! Scenarios against a live Postgres. Run with
//! `DATABASE_URL=postgres://... cargo test -- --ignored`.

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use eagleworks_be::{
    auth::generate_jwt,
    build_app,
    db::{
        account::{authenticate, signup_company, signup_freelancer},
        company::{get_company, set_logo, update_company},
        freelancer::{
            get_freelancer, search_freelancers, set_profile_picture, set_resume_file,
            update_freelancer,
        },
        rating::{get_received_ratings, rating_status, refresh_average, submit_rating},
    },
    errors::AppError,
    models::{
        AuthContext, CompanyProfile, FreelancerProfile, Role,
        account::PasswordChange,
        company::{CompanySignup, CompanyUpdate},
        freelancer::{FreelancerSignup, FreelancerUpdate, SocialLinks},
        rating::RatingStatus,
        search::{SearchFilter, SearchQuery},
    },
    state::AppState,
    uploads::{UploadKind, UploadStore},
};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

const PASSWORD: &str = "correct horse";

fn freelancer_form(
    email: &str,
    name: &str,
    profession: &str,
    availability: &str,
) -> FreelancerSignup {
    FreelancerSignup {
        email: email.into(),
        password: PASSWORD.into(),
        confirm_password: PASSWORD.into(),
        full_name: name.into(),
        profession: profession.into(),
        phone: None,
        availability: availability.into(),
        resume: format!("{name} portfolio"),
        social_links: SocialLinks::default(),
    }
}

fn company_form(email: &str, name: &str, tax_id: &str) -> CompanySignup {
    CompanySignup {
        email: email.into(),
        password: PASSWORD.into(),
        confirm_password: PASSWORD.into(),
        company_name: name.into(),
        tax_id: tax_id.into(),
        industry: "Retail".into(),
        address: "Rua A, 1".into(),
        phone: Some("555".into()),
    }
}

async fn create_freelancer(pool: &PgPool, email: &str, availability: &str) -> FreelancerProfile {
    let new = freelancer_form(email, "Ana", "Designer", availability)
        .validate()
        .unwrap();
    signup_freelancer(new, pool.clone()).await.unwrap()
}

async fn create_company(pool: &PgPool, email: &str, tax_id: &str) -> CompanyProfile {
    let new = company_form(email, "Acme", tax_id).validate().unwrap();
    signup_company(new, pool.clone()).await.unwrap()
}

fn ctx_of_freelancer(profile: &FreelancerProfile) -> AuthContext {
    AuthContext {
        account_id: profile.account_id,
        role: Role::Freelancer,
    }
}

fn ctx_of_company(profile: &CompanyProfile) -> AuthContext {
    AuthContext {
        account_id: profile.account_id,
        role: Role::Company,
    }
}

async fn rate(pool: &PgPool, ctx: &AuthContext, rated_profile_id: Uuid, score: i64) {
    submit_rating(ctx, rated_profile_id, score, None, pool.clone())
        .await
        .unwrap();
}

async fn company_average(pool: &PgPool, profile_id: Uuid) -> f64 {
    get_company(profile_id, pool.clone())
        .await
        .unwrap()
        .average_rating
}

async fn freelancer_average(pool: &PgPool, profile_id: Uuid) -> f64 {
    get_freelancer(profile_id, pool.clone())
        .await
        .unwrap()
        .average_rating
}

async fn count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_signup_creates_account_and_profile(pool: PgPool) {
    let profile = create_freelancer(&pool, " Ana@Example.com ", "São Paulo").await;

    assert_eq!(profile.email, "ana@example.com");
    assert_eq!(profile.average_rating, 0.0);
    assert_eq!(profile.profile_picture, "default-profile.jpg");

    let account = authenticate("ana@example.com", PASSWORD, pool.clone())
        .await
        .unwrap();
    assert_eq!(account.id, profile.account_id);
    assert_eq!(account.role, Role::Freelancer);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_duplicate_email_is_rejected_without_side_effects(pool: PgPool) {
    create_freelancer(&pool, "ana@example.com", "São Paulo").await;

    let again = company_form("ANA@example.com", "Acme", "12345678000190")
        .validate()
        .unwrap();
    let result = signup_company(again, pool.clone()).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!(count(&pool, "accounts").await, 1);
    assert_eq!(count(&pool, "companies").await, 0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_failed_company_signup_leaves_no_account(pool: PgPool) {
    create_company(&pool, "hr@acme.com", "12.345.678/0001-90").await;

    let clash = company_form("hr@other.com", "Other", "12345678000190")
        .validate()
        .unwrap();
    let result = signup_company(clash, pool.clone()).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!(count(&pool, "accounts").await, 1);
    assert!(
        authenticate("hr@other.com", PASSWORD, pool.clone())
            .await
            .is_err()
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_wrong_password_and_unknown_email_look_the_same(pool: PgPool) {
    create_freelancer(&pool, "ana@example.com", "São Paulo").await;

    let wrong = authenticate("ana@example.com", "not the password", pool.clone())
        .await
        .unwrap_err()
        .to_response();
    let unknown = authenticate("nobody@example.com", PASSWORD, pool.clone())
        .await
        .unwrap_err()
        .to_response();

    assert_eq!(wrong, unknown);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_average_follows_ledger_and_duplicates_change_nothing(pool: PgPool) {
    let company = create_company(&pool, "hr@acme.com", "12345678000190").await;
    let mut raters = Vec::new();
    for (i, score) in [5, 3, 4].into_iter().enumerate() {
        let freelancer = create_freelancer(&pool, &format!("f{i}@example.com"), "Recife").await;
        rate(&pool, &ctx_of_freelancer(&freelancer), company.id, score).await;
        raters.push(freelancer);
    }

    assert_eq!(company_average(&pool, company.id).await, 4.0);

    let repeat = submit_rating(
        &ctx_of_freelancer(&raters[0]),
        company.id,
        2,
        Some("changed my mind".into()),
        pool.clone(),
    )
    .await;

    assert!(matches!(repeat, Err(AppError::DuplicateRating)));
    assert_eq!(count(&pool, "ratings").await, 3);
    assert_eq!(company_average(&pool, company.id).await, 4.0);

    let received = get_received_ratings(company.id, Role::Company, pool.clone())
        .await
        .unwrap();
    assert_eq!(received.len(), 3);
    assert!(received.iter().all(|r| r.rated_by == Role::Freelancer));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_refresh_average_is_idempotent(pool: PgPool) {
    let company = create_company(&pool, "hr@acme.com", "12345678000190").await;
    for (i, score) in [5, 4].into_iter().enumerate() {
        let freelancer = create_freelancer(&pool, &format!("f{i}@example.com"), "Recife").await;
        rate(&pool, &ctx_of_freelancer(&freelancer), company.id, score).await;
    }

    let first = refresh_average(company.id, Role::Company, pool.clone())
        .await
        .unwrap();
    let second = refresh_average(company.id, Role::Company, pool.clone())
        .await
        .unwrap();

    // 4.5 exactly, no float drift
    assert_eq!(first, 4.5);
    assert_eq!(first, second);
    assert_eq!(company_average(&pool, company.id).await, 4.5);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_directions_are_counted_separately(pool: PgPool) {
    let company = create_company(&pool, "hr@acme.com", "12345678000190").await;
    let freelancer = create_freelancer(&pool, "ana@example.com", "Recife").await;

    rate(&pool, &ctx_of_freelancer(&freelancer), company.id, 5).await;
    rate(&pool, &ctx_of_company(&company), freelancer.id, 2).await;

    assert_eq!(company_average(&pool, company.id).await, 5.0);
    assert_eq!(freelancer_average(&pool, freelancer.id).await, 2.0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_same_role_target_is_rejected(pool: PgPool) {
    let ana = create_freelancer(&pool, "ana@example.com", "Recife").await;
    let bia = create_freelancer(&pool, "bia@example.com", "Recife").await;

    let ctx = ctx_of_freelancer(&ana);
    let result = submit_rating(&ctx, bia.id, 5, None, pool.clone()).await;

    assert!(matches!(result, Err(AppError::InvalidRole)));
    assert_eq!(count(&pool, "ratings").await, 0);
    assert_eq!(freelancer_average(&pool, bia.id).await, 0.0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_concurrent_duplicates_record_one_rating(pool: PgPool) {
    let company = create_company(&pool, "hr@acme.com", "12345678000190").await;
    let freelancer = create_freelancer(&pool, "ana@example.com", "Recife").await;
    let ctx = ctx_of_freelancer(&freelancer);

    let (first, second) = tokio::join!(
        submit_rating(&ctx, company.id, 5, None, pool.clone()),
        submit_rating(&ctx, company.id, 1, None, pool.clone()),
    );

    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        outcomes
            .iter()
            .any(|r| matches!(r, Err(AppError::DuplicateRating)))
    );
    assert_eq!(count(&pool, "ratings").await, 1);

    let stored = outcomes
        .iter()
        .find_map(|r| r.as_ref().ok())
        .unwrap()
        .score;
    assert_eq!(company_average(&pool, company.id).await, f64::from(stored));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_concurrent_raters_all_count(pool: PgPool) {
    let company = create_company(&pool, "hr@acme.com", "12345678000190").await;
    let mut contexts = Vec::new();
    for i in 0..4 {
        let freelancer = create_freelancer(&pool, &format!("f{i}@example.com"), "Recife").await;
        contexts.push(ctx_of_freelancer(&freelancer));
    }

    let handles: Vec<_> = contexts
        .into_iter()
        .zip([1, 2, 4, 5])
        .map(|(ctx, score)| {
            let pool = pool.clone();
            let company_id = company.id;
            tokio::spawn(async move { submit_rating(&ctx, company_id, score, None, pool).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(company_average(&pool, company.id).await, 3.0);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_rating_status_tracks_submission(pool: PgPool) {
    let company = create_company(&pool, "hr@acme.com", "12345678000190").await;
    let freelancer = create_freelancer(&pool, "ana@example.com", "Recife").await;
    let ctx = ctx_of_company(&company);

    let before = rating_status(&ctx, freelancer.id, pool.clone())
        .await
        .unwrap();
    assert_eq!(
        before,
        RatingStatus {
            can_rate: true,
            has_rated: false
        }
    );

    rate(&pool, &ctx, freelancer.id, 4).await;

    let after = rating_status(&ctx, freelancer.id, pool.clone())
        .await
        .unwrap();
    assert_eq!(
        after,
        RatingStatus {
            can_rate: false,
            has_rated: true
        }
    );

    let own_side = rating_status(&ctx, company.id, pool.clone())
        .await
        .unwrap();
    assert!(!own_side.can_rate);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_search_filters_and_orders_by_rating(pool: PgPool) {
    let signups = [
        ("low@example.com", "Lia", "Designer", "São Paulo, weekdays"),
        ("high@example.com", "Duda", "Designer", "sao paulo / São Paulo"),
        ("other@example.com", "Caio", "Designer", "Recife"),
        ("dev@example.com", "Rui", "Desenvolvedor Web", "São Paulo"),
    ];
    let mut profiles = Vec::new();
    for (email, name, profession, availability) in signups {
        let new = freelancer_form(email, name, profession, availability)
            .validate()
            .unwrap();
        profiles.push(signup_freelancer(new, pool.clone()).await.unwrap());
    }

    let company = create_company(&pool, "hr@acme.com", "12345678000190").await;
    let ctx = ctx_of_company(&company);
    rate(&pool, &ctx, profiles[0].id, 2).await;
    rate(&pool, &ctx, profiles[1].id, 5).await;

    let filter = SearchFilter::try_from(SearchQuery {
        profession: Some("Designer".into()),
        region: Some("são paulo".into()),
        keyword: None,
    })
    .unwrap();
    let found = search_freelancers(&filter, pool.clone()).await.unwrap();

    let names: Vec<_> = found.iter().map(|f| f.full_name.as_str()).collect();
    assert_eq!(names, vec!["Duda", "Lia"]);

    let everyone = search_freelancers(&SearchFilter::default(), pool.clone())
        .await
        .unwrap();
    assert_eq!(everyone.len(), 4);
    assert_eq!(everyone[0].full_name, "Duda");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_wrong_current_password_rolls_back_profile_edit(pool: PgPool) {
    let freelancer = create_freelancer(&pool, "ana@example.com", "Recife").await;
    let form = FreelancerUpdate {
        full_name: "Ana Maria".into(),
        profession: "Fotógrafo".into(),
        phone: None,
        availability: "Recife".into(),
        resume: "Weddings".into(),
        social_links: SocialLinks::default(),
        password: PasswordChange {
            current_password: Some("not the password".into()),
            new_password: Some("brand new secret".into()),
            confirm_password: Some("brand new secret".into()),
        },
    };
    let details = form.validate().unwrap();

    let result = update_freelancer(
        &ctx_of_freelancer(&freelancer),
        details,
        &form.password,
        pool.clone(),
    )
    .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    let unchanged = get_freelancer(freelancer.id, pool.clone()).await.unwrap();
    assert_eq!(unchanged.full_name, "Ana");
    let login = authenticate("ana@example.com", PASSWORD, pool.clone()).await;
    assert!(login.is_ok());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_company_cannot_take_another_tax_id(pool: PgPool) {
    create_company(&pool, "hr@acme.com", "12345678000190").await;
    let other = create_company(&pool, "hr@other.com", "98765432000110").await;

    let mut form = CompanyUpdate {
        company_name: "Other".into(),
        industry: "Logistics".into(),
        tax_id: "98.765.432/0001-10".into(),
        address: "Rua B, 2".into(),
        phone: "777".into(),
        password: PasswordChange::default(),
    };

    // keeping its own tax id is fine
    let updated = update_company(
        &ctx_of_company(&other),
        form.validate().unwrap(),
        &form.password,
        pool.clone(),
    )
    .await
    .unwrap();
    assert_eq!(updated.industry, "Logistics");
    assert_eq!(updated.contact.phone.as_deref(), Some("777"));

    form.tax_id = "12345678000190".into();
    let result = update_company(
        &ctx_of_company(&other),
        form.validate().unwrap(),
        &form.password,
        pool.clone(),
    )
    .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
    assert_eq!(
        get_company(other.id, pool.clone()).await.unwrap().tax_id,
        "98765432000110"
    );
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_stored_upload_names_replace_defaults(pool: PgPool) {
    let freelancer = create_freelancer(&pool, "ana@example.com", "São Paulo").await;
    let company = create_company(&pool, "hr@acme.com", "12345678000190").await;
    assert_eq!(freelancer.resume_file, None);
    assert_eq!(company.logo, "default-company.jpg");

    set_profile_picture(freelancer.account_id, "face.png", pool.clone())
        .await
        .unwrap();
    set_resume_file(freelancer.account_id, "cv.pdf", pool.clone())
        .await
        .unwrap();
    set_logo(company.account_id, "logo.webp", pool.clone())
        .await
        .unwrap();

    let freelancer = get_freelancer(freelancer.id, pool.clone()).await.unwrap();
    assert_eq!(freelancer.profile_picture, "face.png");
    assert_eq!(freelancer.resume_file.as_deref(), Some("cv.pdf"));
    let company = get_company(company.id, pool.clone()).await.unwrap();
    assert_eq!(company.logo, "logo.webp");
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a Postgres DATABASE_URL"]
async fn test_picture_upload_updates_profile(pool: PgPool) {
    const SECRET: &str = "ledger-test-secret";
    const BOUNDARY: &str = "eagleworks-boundary";

    let freelancer = create_freelancer(&pool, "ana@example.com", "São Paulo").await;
    let dir = tempfile::tempdir().unwrap();
    let store = UploadStore::new(dir.path());
    store.ensure_dirs().await.unwrap();
    let state = AppState::new(pool.clone(), store, SECRET);
    let app = build_app(state, &["http://localhost:3000".to_string()]);

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"profile_picture\"; filename=\"me.png\"\r\n",
    );
    body.extend_from_slice(b"Content-Type: image/png\r\n\r\npng bytes");
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let token = generate_jwt(freelancer.account_id, Role::Freelancer, SECRET).unwrap();
    let request = Request::builder()
        .method("POST")
        .uri("/freelancers/me/picture")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let upload: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let stored = upload["fileName"].as_str().unwrap().to_string();

    let on_disk = dir
        .path()
        .join(UploadKind::ProfilePicture.dir_name())
        .join(&stored);
    assert_eq!(std::fs::read(on_disk).unwrap(), b"png bytes");
    let freelancer = get_freelancer(freelancer.id, pool.clone()).await.unwrap();
    assert_eq!(freelancer.profile_picture, stored);
}
