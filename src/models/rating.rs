use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{errors::AppError, models::account::Role};

pub const MIN_SCORE: i64 = 1;
pub const MAX_SCORE: i64 = 5;
pub const MAX_COMMENT_CHARS: usize = 2000;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct RatingEvent {
    pub id: Uuid,
    pub freelancer_id: Uuid,
    pub company_id: Uuid,
    pub rated_by: Role,
    pub score: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A rating as shown on the rated profile, with the reviewer's public face.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedRating {
    pub id: Uuid,
    pub rated_by: Role,
    pub score: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reviewer_id: Uuid,
    pub reviewer_name: String,
    pub reviewer_picture: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingStatus {
    pub can_rate: bool,
    pub has_rated: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingPayload {
    pub rated_profile_id: Uuid,
    pub score: i64,
    #[serde(default)]
    pub comment: Option<String>,
}

pub fn validate_score(score: i64) -> Result<i16, AppError> {
    if (MIN_SCORE..=MAX_SCORE).contains(&score) {
        Ok(score as i16)
    } else {
        Err(AppError::InvalidScore)
    }
}

pub fn normalize_comment(comment: Option<String>) -> Result<Option<String>, AppError> {
    let Some(comment) = comment else {
        return Ok(None);
    };

    let trimmed = comment.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > MAX_COMMENT_CHARS {
        return Err(AppError::Validation(vec![format!(
            "Comment must be at most {MAX_COMMENT_CHARS} characters."
        )]));
    }

    Ok(Some(trimmed.to_string()))
}

/// Mean of `count` scores summing to `sum`, rounded half-up to one decimal.
/// Integer arithmetic keeps the result identical on every platform.
pub fn rounded_mean(sum: i64, count: i64) -> f64 {
    if count <= 0 {
        return 0.0;
    }

    let tenths = (20 * sum + count).div_euclid(2 * count);
    tenths as f64 / 10.0
}

/// Assigns the rater and rated profile ids to their ledger columns.
pub fn pair_ids(rater_role: Role, rater_profile_id: Uuid, rated_profile_id: Uuid) -> (Uuid, Uuid) {
    match rater_role {
        Role::Freelancer => (rater_profile_id, rated_profile_id),
        Role::Company => (rated_profile_id, rater_profile_id),
    }
}
