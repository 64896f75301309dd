use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    db::{db_error, freelancer::FREELANCER_SELECT},
    errors::AppError,
    models::FreelancerProfile,
};

pub(crate) async fn fetch_freelancer(
    conn: &mut PgConnection,
    profile_id: Uuid,
) -> Result<FreelancerProfile, AppError> {
    sqlx::query_as::<_, FreelancerProfile>(&format!("{FREELANCER_SELECT} WHERE f.id = $1"))
        .bind(profile_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_error("Failed to fetch freelancer"))?
        .ok_or_else(|| AppError::NotFound("Freelancer not found".into()))
}

pub async fn get_freelancer(
    profile_id: Uuid,
    postgres: PgPool,
) -> Result<FreelancerProfile, AppError> {
    let mut conn = postgres
        .acquire()
        .await
        .map_err(db_error("Failed to acquire connection"))?;

    fetch_freelancer(&mut conn, profile_id).await
}

pub async fn get_freelancer_by_account(
    account_id: Uuid,
    postgres: PgPool,
) -> Result<FreelancerProfile, AppError> {
    sqlx::query_as::<_, FreelancerProfile>(&format!("{FREELANCER_SELECT} WHERE f.account_id = $1"))
        .bind(account_id)
        .fetch_optional(&postgres)
        .await
        .map_err(db_error("Failed to fetch freelancer by account"))?
        .ok_or_else(|| AppError::NotFound("Freelancer profile not found".into()))
}
