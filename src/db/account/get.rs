use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    auth::{verify_dummy_password_blocking, verify_password_blocking},
    db::db_error,
    errors::AppError,
    models::{Account, Role},
    validation::normalize_email,
};

pub async fn find_account_by_email(
    email: &str,
    postgres: PgPool,
) -> Result<Option<Account>, AppError> {
    sqlx::query_as::<_, Account>(
        "SELECT id, email, password_hash, role, created_at
            FROM accounts
            WHERE email = $1",
    )
    .bind(normalize_email(email))
    .fetch_optional(&postgres)
    .await
    .map_err(db_error("Failed to query account by email"))
}

pub(crate) async fn email_taken(conn: &mut PgConnection, email: &str) -> Result<bool, AppError> {
    let existing = sqlx::query_scalar::<_, Uuid>("SELECT id FROM accounts WHERE email = $1")
        .bind(email)
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_error("Failed to check email"))?;

    Ok(existing.is_some())
}

pub(crate) async fn password_hash_of(
    conn: &mut PgConnection,
    account_id: Uuid,
) -> Result<String, AppError> {
    sqlx::query_scalar::<_, String>("SELECT password_hash FROM accounts WHERE id = $1")
        .bind(account_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_error("Failed to load password hash"))?
        .ok_or_else(|| AppError::NotFound("Account not found".into()))
}

pub(crate) async fn email_of(
    conn: &mut PgConnection,
    account_id: Uuid,
) -> Result<String, AppError> {
    sqlx::query_scalar::<_, String>("SELECT email FROM accounts WHERE id = $1")
        .bind(account_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_error("Failed to load account email"))?
        .ok_or_else(|| AppError::NotFound("Account not found".into()))
}

/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn authenticate(
    email: &str,
    password: &str,
    postgres: PgPool,
) -> Result<Account, AppError> {
    let invalid = || AppError::Unauthorized("Invalid email or password".into());

    let Some(account) = find_account_by_email(email, postgres).await? else {
        tracing::warn!("Login attempt for unknown email");
        // Same argon2 cost as a known account
        verify_dummy_password_blocking(password.to_string()).await?;
        return Err(invalid());
    };

    if !verify_password_blocking(password.to_string(), account.password_hash.clone()).await? {
        tracing::warn!("Wrong password for account {}", account.id);
        return Err(invalid());
    }

    Ok(account)
}

/// Id of the single profile of `role` owned by the account.
pub async fn profile_id_for_account(
    conn: &mut PgConnection,
    account_id: Uuid,
    role: Role,
) -> Result<Option<Uuid>, AppError> {
    let sql = format!(
        "SELECT id FROM {} WHERE account_id = $1",
        role.profile_table()
    );

    sqlx::query_scalar::<_, Uuid>(&sql)
        .bind(account_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_error("Failed to resolve profile for account"))
}
