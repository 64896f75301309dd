use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{errors::AppError, validation::Violations};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "account_role", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Freelancer,
    Company,
}

impl Role {
    /// The role on the other side of a rating.
    pub fn counterpart(self) -> Role {
        match self {
            Role::Freelancer => Role::Company,
            Role::Company => Role::Freelancer,
        }
    }

    pub fn profile_table(self) -> &'static str {
        match self {
            Role::Freelancer => "freelancers",
            Role::Company => "companies",
        }
    }

    /// Column of the `ratings` table holding a profile of this role.
    pub fn rating_column(self) -> &'static str {
        match self {
            Role::Freelancer => "freelancer_id",
            Role::Company => "company_id",
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // account ID
    pub role: Role,
    pub exp: usize, // expiration time
}

impl Claims {
    pub fn context(&self) -> Result<AuthContext, AppError> {
        let account_id = Uuid::parse_str(&self.sub)
            .map_err(|_| AppError::Unauthorized("Invalid account ID in token".into()))?;

        Ok(AuthContext {
            account_id,
            role: self.role,
        })
    }
}

/// The authenticated caller, handed explicitly to every operation that acts
/// on behalf of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub account_id: Uuid,
    pub role: Role,
}

impl AuthContext {
    pub fn require_role(&self, role: Role) -> Result<(), AppError> {
        if self.role == role {
            Ok(())
        } else {
            Err(AppError::Forbidden)
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub account_id: Uuid,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginPayload {
    pub fn validate(&self) -> Result<(), AppError> {
        let mut violations = Violations::new();
        violations.check_email(&self.email);
        violations.require(&self.password, "Password is required.");
        violations.into_result()
    }
}

/// Optional password change carried by the profile edit forms. Empty fields
/// count as absent.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    #[serde(default)]
    pub current_password: Option<String>,
    #[serde(default)]
    pub new_password: Option<String>,
    #[serde(default)]
    pub confirm_password: Option<String>,
}

impl PasswordChange {
    fn field(value: &Option<String>) -> &str {
        value.as_deref().unwrap_or("")
    }

    pub fn current(&self) -> &str {
        Self::field(&self.current_password)
    }

    pub fn new_password(&self) -> &str {
        Self::field(&self.new_password)
    }

    pub fn requested(&self) -> bool {
        !self.current().is_empty()
            || !self.new_password().is_empty()
            || !Self::field(&self.confirm_password).is_empty()
    }

    pub fn check(&self, violations: &mut Violations) {
        if !self.requested() {
            return;
        }

        violations.require(
            self.current(),
            "Current password is required to change the password.",
        );
        if self.new_password().is_empty() {
            violations.push("New password is required.");
        } else {
            violations.check_password_strength(self.new_password(), "New password");
        }
        if self.new_password() != Self::field(&self.confirm_password) {
            violations.push("Password confirmation does not match.");
        }
    }
}
