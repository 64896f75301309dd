use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::account::PasswordChange,
    validation::{Violations, normalize_email, optional_text, tax_id_digits},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub id: Uuid,
    pub account_id: Uuid,
    pub email: String,
    pub name: String,
    pub industry: String,
    pub tax_id: String,
    pub address: String,
    pub contact: Json<ContactInfo>,
    pub logo: String,
    pub average_rating: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompanyDetails {
    pub name: String,
    pub industry: String,
    /// Digits only.
    pub tax_id: String,
    pub address: String,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanySignup {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub tax_id: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewCompany {
    pub email: String,
    pub password: String,
    pub details: CompanyDetails,
}

impl CompanySignup {
    pub fn validate(&self) -> Result<NewCompany, AppError> {
        let mut violations = Violations::new();
        violations.check_email(&self.email);
        violations.check_new_account_password(&self.password, &self.confirm_password);
        violations.require(&self.company_name, "Company name is required.");
        violations.check_tax_id(&self.tax_id);
        violations.require(&self.industry, "Industry is required.");
        violations.require(&self.address, "Address is required.");
        violations.into_result()?;

        Ok(NewCompany {
            email: normalize_email(&self.email),
            password: self.password.clone(),
            details: CompanyDetails {
                name: self.company_name.trim().to_string(),
                industry: self.industry.trim().to_string(),
                tax_id: tax_id_digits(&self.tax_id),
                address: self.address.trim().to_string(),
                phone: optional_text(self.phone.as_deref()),
            },
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyUpdate {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub tax_id: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(flatten)]
    pub password: PasswordChange,
}

impl CompanyUpdate {
    pub fn validate(&self) -> Result<CompanyDetails, AppError> {
        let mut violations = Violations::new();
        violations.require(&self.company_name, "Company name is required.");
        violations.require(&self.industry, "Industry is required.");
        violations.check_tax_id(&self.tax_id);
        violations.require(&self.address, "Address is required.");
        violations.require(&self.phone, "Phone is required.");
        self.password.check(&mut violations);
        violations.into_result()?;

        Ok(CompanyDetails {
            name: self.company_name.trim().to_string(),
            industry: self.industry.trim().to_string(),
            tax_id: tax_id_digits(&self.tax_id),
            address: self.address.trim().to_string(),
            phone: optional_text(Some(&self.phone)),
        })
    }
}

pub fn contact_for(email: &str, phone: Option<String>) -> ContactInfo {
    ContactInfo {
        email: Some(normalize_email(email)),
        phone,
    }
}
