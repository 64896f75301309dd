use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    auth::{hash_password_blocking, verify_password_blocking},
    db::{account::get::password_hash_of, db_error},
    errors::AppError,
    models::account::PasswordChange,
};

/// Re-authenticates with the current password, then stores the new one.
/// Runs on the caller's transaction so it commits with the profile edit.
pub async fn apply_password_change(
    conn: &mut PgConnection,
    account_id: Uuid,
    change: &PasswordChange,
) -> Result<(), AppError> {
    let stored = password_hash_of(&mut *conn, account_id).await?;
    if !verify_password_blocking(change.current().to_string(), stored).await? {
        tracing::warn!(
            "Password change with wrong current password for {}",
            account_id
        );
        return Err(AppError::Validation(vec![
            "Current password is incorrect.".into(),
        ]));
    }

    let new_hash = hash_password_blocking(change.new_password().to_string()).await?;
    sqlx::query("UPDATE accounts SET password_hash = $1 WHERE id = $2")
        .bind(new_hash)
        .bind(account_id)
        .execute(&mut *conn)
        .await
        .map_err(db_error("Failed to update password"))?;

    tracing::info!("Password changed for account {}", account_id);
    Ok(())
}
