use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    db::{account::get::profile_id_for_account, db_error},
    errors::AppError,
    models::{
        AuthContext, ReceivedRating, Role,
        rating::{RatingStatus, pair_ids},
    },
};

const RATINGS_OF_COMPANY: &str = "SELECT r.id, r.rated_by, r.score, r.comment, r.created_at,
        f.id AS reviewer_id, f.full_name AS reviewer_name,
        f.profile_picture AS reviewer_picture
    FROM ratings r
    JOIN freelancers f ON f.id = r.freelancer_id
    WHERE r.company_id = $1 AND r.rated_by = $2
    ORDER BY r.created_at DESC, r.id";

const RATINGS_OF_FREELANCER: &str = "SELECT r.id, r.rated_by, r.score, r.comment, r.created_at,
        c.id AS reviewer_id, c.name AS reviewer_name, c.logo AS reviewer_picture
    FROM ratings r
    JOIN companies c ON c.id = r.company_id
    WHERE r.freelancer_id = $1 AND r.rated_by = $2
    ORDER BY r.created_at DESC, r.id";

/// Ratings targeting a profile, newest first.
pub async fn get_received_ratings(
    profile_id: Uuid,
    kind: Role,
    postgres: PgPool,
) -> Result<Vec<ReceivedRating>, AppError> {
    let sql = match kind {
        Role::Freelancer => RATINGS_OF_FREELANCER,
        Role::Company => RATINGS_OF_COMPANY,
    };

    sqlx::query_as::<_, ReceivedRating>(sql)
        .bind(profile_id)
        .bind(kind.counterpart())
        .fetch_all(&postgres)
        .await
        .map_err(db_error("Failed to fetch ratings"))
}

pub async fn has_rated(
    conn: &mut PgConnection,
    freelancer_id: Uuid,
    company_id: Uuid,
    rated_by: Role,
) -> Result<bool, AppError> {
    let existing = sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM ratings
            WHERE freelancer_id = $1 AND company_id = $2 AND rated_by = $3",
    )
    .bind(freelancer_id)
    .bind(company_id)
    .bind(rated_by)
    .fetch_optional(&mut *conn)
    .await
    .map_err(db_error("Failed to check existing rating"))?;

    Ok(existing.is_some())
}

pub(crate) async fn profile_exists(
    conn: &mut PgConnection,
    profile_id: Uuid,
    kind: Role,
) -> Result<bool, AppError> {
    let sql = format!("SELECT id FROM {} WHERE id = $1", kind.profile_table());

    let found = sqlx::query_scalar::<_, Uuid>(&sql)
        .bind(profile_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_error("Failed to look up profile"))?;

    Ok(found.is_some())
}

/// Whether the caller may still rate the profile, and whether it already
/// did.
pub async fn rating_status(
    ctx: &AuthContext,
    rated_profile_id: Uuid,
    postgres: PgPool,
) -> Result<RatingStatus, AppError> {
    let not_allowed = RatingStatus {
        can_rate: false,
        has_rated: false,
    };

    let mut conn = postgres
        .acquire()
        .await
        .map_err(db_error("Failed to acquire connection"))?;

    let Some(rater_id) = profile_id_for_account(&mut conn, ctx.account_id, ctx.role).await? else {
        return Ok(not_allowed);
    };
    if !profile_exists(&mut conn, rated_profile_id, ctx.role.counterpart()).await? {
        return Ok(not_allowed);
    }

    let (freelancer_id, company_id) = pair_ids(ctx.role, rater_id, rated_profile_id);
    let has_rated = has_rated(&mut conn, freelancer_id, company_id, ctx.role).await?;

    Ok(RatingStatus {
        can_rate: !has_rated,
        has_rated,
    })
}
