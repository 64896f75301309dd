use sqlx::{PgConnection, PgPool, types::Json};
use uuid::Uuid;

use crate::{
    auth::hash_password_blocking,
    db::{
        EMAIL_IN_USE, TAX_ID_IN_USE,
        account::get::email_taken,
        company::get::{fetch_company, tax_id_taken},
        db_error,
        freelancer::get::fetch_freelancer,
        write_error,
    },
    errors::AppError,
    models::{
        CompanyProfile, FreelancerProfile, Role,
        company::{NewCompany, contact_for},
        freelancer::NewFreelancer,
    },
};

async fn insert_account(
    conn: &mut PgConnection,
    email: &str,
    password_hash: &str,
    role: Role,
) -> Result<Uuid, AppError> {
    // Check if an account with the same email already exists.
    // Early exit only; the unique constraint settles concurrent signups.
    if email_taken(&mut *conn, email).await? {
        return Err(AppError::Conflict(EMAIL_IN_USE.into()));
    }

    let account_id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO accounts (id, email, password_hash, role)
        VALUES ($1, $2, $3, $4)",
    )
    .bind(account_id)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .execute(&mut *conn)
    .await
    .map_err(write_error("Failed to create account"))?;

    Ok(account_id)
}

/// Creates the account and its freelancer profile together; on any failure
/// neither exists.
pub async fn signup_freelancer(
    new: NewFreelancer,
    postgres: PgPool,
) -> Result<FreelancerProfile, AppError> {
    // Hash before opening the transaction
    let password_hash = hash_password_blocking(new.password).await?;

    let mut tx = postgres
        .begin()
        .await
        .map_err(db_error("Failed to begin signup transaction"))?;

    let account_id = insert_account(&mut tx, &new.email, &password_hash, Role::Freelancer).await?;

    // Insert the profile owned by the new account
    let profile_id = Uuid::new_v4();
    let details = new.details;
    sqlx::query(
        "INSERT INTO freelancers (
            id, account_id, full_name, profession, resume, phone, availability, social_links
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(profile_id)
    .bind(account_id)
    .bind(&details.full_name)
    .bind(details.profession)
    .bind(&details.resume)
    .bind(&details.phone)
    .bind(&details.availability)
    .bind(Json(&details.social_links))
    .execute(&mut *tx)
    .await
    .map_err(write_error("Failed to create freelancer profile"))?;

    let profile = fetch_freelancer(&mut tx, profile_id).await?;

    tx.commit()
        .await
        .map_err(write_error("Failed to commit signup"))?;

    tracing::info!(
        "Freelancer signed up: account {} profile {}",
        account_id,
        profile_id
    );
    Ok(profile)
}

pub async fn signup_company(new: NewCompany, postgres: PgPool) -> Result<CompanyProfile, AppError> {
    // Hash before opening the transaction
    let password_hash = hash_password_blocking(new.password).await?;

    let mut tx = postgres
        .begin()
        .await
        .map_err(db_error("Failed to begin signup transaction"))?;

    let account_id = insert_account(&mut tx, &new.email, &password_hash, Role::Company).await?;

    // Check if another company already registered this tax ID
    let details = new.details;
    if tax_id_taken(&mut tx, &details.tax_id, None).await? {
        return Err(AppError::Conflict(TAX_ID_IN_USE.into()));
    }

    // Insert the company profile with the account email as contact
    let profile_id = Uuid::new_v4();
    let contact = contact_for(&new.email, details.phone.clone());
    sqlx::query(
        "INSERT INTO companies (id, account_id, name, industry, tax_id, address, contact)
        VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(profile_id)
    .bind(account_id)
    .bind(&details.name)
    .bind(&details.industry)
    .bind(&details.tax_id)
    .bind(&details.address)
    .bind(Json(&contact))
    .execute(&mut *tx)
    .await
    .map_err(write_error("Failed to create company profile"))?;

    let profile = fetch_company(&mut tx, profile_id).await?;

    tx.commit()
        .await
        .map_err(write_error("Failed to commit signup"))?;

    tracing::info!(
        "Company signed up: account {} profile {}",
        account_id,
        profile_id
    );
    Ok(profile)
}
