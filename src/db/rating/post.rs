use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db::{
        account::get::profile_id_for_account,
        db_error,
        rating::{
            aggregate::{lock_profile, recompute_average},
            get::has_rated,
        },
        write_error,
    },
    errors::AppError,
    models::{
        AuthContext, RatingEvent,
        rating::{normalize_comment, pair_ids, validate_score},
    },
};

/// Records the caller's rating of a counterpart profile and refreshes that
/// profile's average, atomically.
pub async fn submit_rating(
    ctx: &AuthContext,
    rated_profile_id: Uuid,
    score: i64,
    comment: Option<String>,
    postgres: PgPool,
) -> Result<RatingEvent, AppError> {
    let score = validate_score(score)?;
    let comment = normalize_comment(comment)?;
    let rated_kind = ctx.role.counterpart();

    let mut tx = postgres
        .begin()
        .await
        .map_err(db_error("Failed to begin rating transaction"))?;

    // Resolve the rater's own profile
    let Some(rater_id) = profile_id_for_account(&mut tx, ctx.account_id, ctx.role).await? else {
        tracing::warn!("Account {} has no {:?} profile", ctx.account_id, ctx.role);
        return Err(AppError::InvalidRole);
    };

    // Lock the rated profile so concurrent ratings recompute in order.
    // Same-role targets are not found in the counterpart table.
    if !lock_profile(&mut tx, rated_profile_id, rated_kind).await? {
        tracing::warn!(
            "Account {} tried to rate {} which is not a {:?}",
            ctx.account_id,
            rated_profile_id,
            rated_kind
        );
        return Err(AppError::InvalidRole);
    }

    let (freelancer_id, company_id) = pair_ids(ctx.role, rater_id, rated_profile_id);
    // Check if this pair already has a rating in this direction
    if has_rated(&mut tx, freelancer_id, company_id, ctx.role).await? {
        return Err(AppError::DuplicateRating);
    }

    let event = sqlx::query_as::<_, RatingEvent>(
        "INSERT INTO ratings (id, freelancer_id, company_id, rated_by, score, comment)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, freelancer_id, company_id, rated_by, score, comment, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(freelancer_id)
    .bind(company_id)
    .bind(ctx.role)
    .bind(score)
    .bind(&comment)
    .fetch_one(&mut *tx)
    .await
    .map_err(write_error("Failed to insert rating"))?;

    // Refresh the rated profile's average inside the same transaction
    let average = recompute_average(&mut tx, rated_profile_id, rated_kind).await?;

    tx.commit()
        .await
        .map_err(write_error("Failed to commit rating"))?;

    tracing::info!(
        "{:?} {} rated {} with {}; new average {}",
        ctx.role,
        rater_id,
        rated_profile_id,
        score,
        average
    );
    Ok(event)
}
