use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    db::{company::COMPANY_SELECT, db_error},
    errors::AppError,
    models::CompanyProfile,
};

pub(crate) async fn fetch_company(
    conn: &mut PgConnection,
    profile_id: Uuid,
) -> Result<CompanyProfile, AppError> {
    sqlx::query_as::<_, CompanyProfile>(&format!("{COMPANY_SELECT} WHERE c.id = $1"))
        .bind(profile_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_error("Failed to fetch company"))?
        .ok_or_else(|| AppError::NotFound("Company not found".into()))
}

pub async fn get_company(profile_id: Uuid, postgres: PgPool) -> Result<CompanyProfile, AppError> {
    let mut conn = postgres
        .acquire()
        .await
        .map_err(db_error("Failed to acquire connection"))?;

    fetch_company(&mut conn, profile_id).await
}

pub async fn get_company_by_account(
    account_id: Uuid,
    postgres: PgPool,
) -> Result<CompanyProfile, AppError> {
    sqlx::query_as::<_, CompanyProfile>(&format!("{COMPANY_SELECT} WHERE c.account_id = $1"))
        .bind(account_id)
        .fetch_optional(&postgres)
        .await
        .map_err(db_error("Failed to fetch company by account"))?
        .ok_or_else(|| AppError::NotFound("Company profile not found".into()))
}

pub(crate) async fn tax_id_taken(
    conn: &mut PgConnection,
    tax_id: &str,
    except_account: Option<Uuid>,
) -> Result<bool, AppError> {
    let existing = sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM companies
            WHERE tax_id = $1 AND ($2::UUID IS NULL OR account_id <> $2)",
    )
    .bind(tax_id)
    .bind(except_account)
    .fetch_optional(&mut *conn)
    .await
    .map_err(db_error("Failed to check tax ID"))?;

    Ok(existing.is_some())
}
