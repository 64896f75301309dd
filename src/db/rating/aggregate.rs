use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    db::db_error,
    errors::AppError,
    models::{Role, rating::rounded_mean},
};

/// Locks the profile row so aggregate recomputations for it run one at a
/// time. Returns false when no profile of `kind` has that id.
///
/// NO KEY UPDATE leaves the key-share locks taken by the ratings foreign
/// keys compatible, so two counterparts rating each other cannot deadlock.
pub(crate) async fn lock_profile(
    conn: &mut PgConnection,
    profile_id: Uuid,
    kind: Role,
) -> Result<bool, AppError> {
    let sql = format!(
        "SELECT id FROM {} WHERE id = $1 FOR NO KEY UPDATE",
        kind.profile_table()
    );

    let locked = sqlx::query_scalar::<_, Uuid>(&sql)
        .bind(profile_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_error("Failed to lock rated profile"))?;

    Ok(locked.is_some())
}

/// Recomputes the cached average of a profile from the full ledger and
/// stores it. Only ratings authored by the other role count.
pub async fn recompute_average(
    conn: &mut PgConnection,
    profile_id: Uuid,
    kind: Role,
) -> Result<f64, AppError> {
    let sql = format!(
        "SELECT COALESCE(SUM(score), 0)::BIGINT, COUNT(*)
            FROM ratings
            WHERE {} = $1 AND rated_by = $2",
        kind.rating_column()
    );

    let (sum, count) = sqlx::query_as::<_, (i64, i64)>(&sql)
        .bind(profile_id)
        .bind(kind.counterpart())
        .fetch_one(&mut *conn)
        .await
        .map_err(db_error("Failed to aggregate ratings"))?;

    let average = rounded_mean(sum, count);

    let sql = format!(
        "UPDATE {} SET average_rating = $1 WHERE id = $2",
        kind.profile_table()
    );
    let result = sqlx::query(&sql)
        .bind(average)
        .bind(profile_id)
        .execute(&mut *conn)
        .await
        .map_err(db_error("Failed to store average rating"))?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Rated profile not found".into()));
    }

    tracing::debug!(
        "Average of {:?} {} is {} over {} ratings",
        kind,
        profile_id,
        average,
        count
    );
    Ok(average)
}

/// Standalone recomputation in its own transaction.
pub async fn refresh_average(
    profile_id: Uuid,
    kind: Role,
    postgres: PgPool,
) -> Result<f64, AppError> {
    let mut tx = postgres
        .begin()
        .await
        .map_err(db_error("Failed to begin aggregate transaction"))?;

    if !lock_profile(&mut tx, profile_id, kind).await? {
        return Err(AppError::NotFound("Rated profile not found".into()));
    }
    let average = recompute_average(&mut tx, profile_id, kind).await?;

    tx.commit()
        .await
        .map_err(db_error("Failed to commit aggregate"))?;

    Ok(average)
}
