use sqlx::{PgPool, types::Json};
use uuid::Uuid;

use crate::{
    db::{
        TAX_ID_IN_USE,
        account::{get::email_of, patch::apply_password_change},
        company::get::{fetch_company, tax_id_taken},
        db_error, write_error,
    },
    errors::AppError,
    models::{
        AuthContext, CompanyProfile, Role,
        account::PasswordChange,
        company::{CompanyDetails, contact_for},
    },
};

/// Applies an edit to the caller's own company profile. A company may keep
/// its tax ID but not take one registered to another company.
pub async fn update_company(
    ctx: &AuthContext,
    details: CompanyDetails,
    password: &PasswordChange,
    postgres: PgPool,
) -> Result<CompanyProfile, AppError> {
    if ctx.role != Role::Company {
        return Err(AppError::Forbidden);
    }

    let mut tx = postgres
        .begin()
        .await
        .map_err(db_error("Failed to begin profile transaction"))?;

    // Check if another company already uses this tax ID
    if tax_id_taken(&mut tx, &details.tax_id, Some(ctx.account_id)).await? {
        return Err(AppError::Conflict(TAX_ID_IN_USE.into()));
    }

    // Password change shares the profile transaction
    if password.requested() {
        apply_password_change(&mut tx, ctx.account_id, password).await?;
    }

    // Contact email always follows the account email
    let email = email_of(&mut tx, ctx.account_id).await?;
    let contact = contact_for(&email, details.phone.clone());

    let profile_id = sqlx::query_scalar::<_, Uuid>(
        "UPDATE companies
            SET name = $1, industry = $2, tax_id = $3, address = $4, contact = $5
            WHERE account_id = $6
            RETURNING id",
    )
    .bind(&details.name)
    .bind(&details.industry)
    .bind(&details.tax_id)
    .bind(&details.address)
    .bind(Json(&contact))
    .bind(ctx.account_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(write_error("Failed to update company"))?
    .ok_or_else(|| AppError::NotFound("Company profile not found".into()))?;

    let profile = fetch_company(&mut tx, profile_id).await?;

    tx.commit()
        .await
        .map_err(db_error("Failed to commit profile update"))?;

    tracing::info!("Updated company profile {}", profile_id);
    Ok(profile)
}

pub async fn set_logo(
    account_id: Uuid,
    stored_name: &str,
    postgres: PgPool,
) -> Result<(), AppError> {
    let result = sqlx::query("UPDATE companies SET logo = $1 WHERE account_id = $2")
        .bind(stored_name)
        .bind(account_id)
        .execute(&postgres)
        .await
        .map_err(db_error("Failed to store company logo reference"))?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Company profile not found".into()));
    }
    Ok(())
}
