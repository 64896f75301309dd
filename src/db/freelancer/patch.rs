use sqlx::{PgPool, types::Json};
use uuid::Uuid;

use crate::{
    db::{account::patch::apply_password_change, db_error, freelancer::get::fetch_freelancer},
    errors::AppError,
    models::{
        AuthContext, FreelancerProfile, Role, account::PasswordChange,
        freelancer::FreelancerDetails,
    },
};

/// Applies an edit to the caller's own freelancer profile, with an optional
/// password change, in one transaction.
pub async fn update_freelancer(
    ctx: &AuthContext,
    details: FreelancerDetails,
    password: &PasswordChange,
    postgres: PgPool,
) -> Result<FreelancerProfile, AppError> {
    if ctx.role != Role::Freelancer {
        return Err(AppError::Forbidden);
    }

    let mut tx = postgres
        .begin()
        .await
        .map_err(db_error("Failed to begin profile transaction"))?;

    // Password change shares the profile transaction
    if password.requested() {
        apply_password_change(&mut tx, ctx.account_id, password).await?;
    }

    let profile_id = sqlx::query_scalar::<_, Uuid>(
        "UPDATE freelancers
            SET full_name = $1, profession = $2, resume = $3, phone = $4,
                availability = $5, social_links = $6
            WHERE account_id = $7
            RETURNING id",
    )
    .bind(&details.full_name)
    .bind(details.profession)
    .bind(&details.resume)
    .bind(&details.phone)
    .bind(&details.availability)
    .bind(Json(&details.social_links))
    .bind(ctx.account_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(db_error("Failed to update freelancer"))?
    .ok_or_else(|| AppError::NotFound("Freelancer profile not found".into()))?;

    let profile = fetch_freelancer(&mut tx, profile_id).await?;

    tx.commit()
        .await
        .map_err(db_error("Failed to commit profile update"))?;

    tracing::info!("Updated freelancer profile {}", profile_id);
    Ok(profile)
}

async fn set_file_column(
    account_id: Uuid,
    column: &'static str,
    stored_name: &str,
    postgres: PgPool,
) -> Result<(), AppError> {
    let sql = format!("UPDATE freelancers SET {column} = $1 WHERE account_id = $2");
    let result = sqlx::query(&sql)
        .bind(stored_name)
        .bind(account_id)
        .execute(&postgres)
        .await
        .map_err(db_error("Failed to store freelancer file reference"))?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Freelancer profile not found".into()));
    }
    Ok(())
}

pub async fn set_profile_picture(
    account_id: Uuid,
    stored_name: &str,
    postgres: PgPool,
) -> Result<(), AppError> {
    set_file_column(account_id, "profile_picture", stored_name, postgres).await
}

pub async fn set_resume_file(
    account_id: Uuid,
    stored_name: &str,
    postgres: PgPool,
) -> Result<(), AppError> {
    set_file_column(account_id, "resume_file", stored_name, postgres).await
}
