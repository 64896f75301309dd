pub mod account;
pub mod company;
pub mod freelancer;
pub mod rating;

use crate::errors::AppError;

pub const ACCOUNT_EMAIL_KEY: &str = "accounts_email_key";
pub const COMPANY_TAX_ID_KEY: &str = "companies_tax_id_key";
pub const RATING_PAIR_KEY: &str = "ratings_pair_direction_key";

pub const EMAIL_IN_USE: &str = "This email is already in use.";
pub const TAX_ID_IN_USE: &str = "This tax ID is already registered.";

pub(crate) fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        tracing::error!("{}: {}", context, e);
        AppError::DatabaseError(format!("{context}: {e}"))
    }
}

/// Name of the unique constraint `e` violated, if that is what happened.
pub(crate) fn violated_unique_constraint(e: &sqlx::Error) -> Option<&str> {
    match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => db.constraint(),
        _ => None,
    }
}

/// Error mapping for statements that write rows guarded by unique
/// constraints. The constraint, not any earlier lookup, decides conflicts.
pub(crate) fn write_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        let conflict = match violated_unique_constraint(&e) {
            Some(ACCOUNT_EMAIL_KEY) => Some(AppError::Conflict(EMAIL_IN_USE.into())),
            Some(COMPANY_TAX_ID_KEY) => Some(AppError::Conflict(TAX_ID_IN_USE.into())),
            Some(RATING_PAIR_KEY) => Some(AppError::DuplicateRating),
            _ => None,
        };
        conflict.unwrap_or_else(|| db_error(context)(e))
    }
}
