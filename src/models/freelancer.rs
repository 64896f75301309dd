use serde::{Deserialize, Serialize};
use sqlx::{FromRow, types::Json};
use uuid::Uuid;

use crate::{
    errors::AppError,
    models::account::PasswordChange,
    validation::{Violations, normalize_email, optional_text},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "profession")]
pub enum Profession {
    Barman,
    #[serde(rename = "Garçom")]
    #[sqlx(rename = "Garçom")]
    Garcom,
    Cozinheiro,
    Diarista,
    Designer,
    #[serde(rename = "Desenvolvedor Web")]
    #[sqlx(rename = "Desenvolvedor Web")]
    DesenvolvedorWeb,
    #[serde(rename = "Fotógrafo")]
    #[sqlx(rename = "Fotógrafo")]
    Fotografo,
    Tradutor,
    Motorista,
    Eletricista,
    Encanador,
    #[serde(rename = "Personal Trainer")]
    #[sqlx(rename = "Personal Trainer")]
    PersonalTrainer,
    #[serde(rename = "Professor Particular")]
    #[sqlx(rename = "Professor Particular")]
    ProfessorParticular,
    #[serde(rename = "Instrutor de Yoga")]
    #[sqlx(rename = "Instrutor de Yoga")]
    InstrutorDeYoga,
    Maquiador,
    Cabeleireiro,
    Outros,
}

impl Profession {
    pub const ALL: [Profession; 17] = [
        Profession::Barman,
        Profession::Garcom,
        Profession::Cozinheiro,
        Profession::Diarista,
        Profession::Designer,
        Profession::DesenvolvedorWeb,
        Profession::Fotografo,
        Profession::Tradutor,
        Profession::Motorista,
        Profession::Eletricista,
        Profession::Encanador,
        Profession::PersonalTrainer,
        Profession::ProfessorParticular,
        Profession::InstrutorDeYoga,
        Profession::Maquiador,
        Profession::Cabeleireiro,
        Profession::Outros,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Profession::Barman => "Barman",
            Profession::Garcom => "Garçom",
            Profession::Cozinheiro => "Cozinheiro",
            Profession::Diarista => "Diarista",
            Profession::Designer => "Designer",
            Profession::DesenvolvedorWeb => "Desenvolvedor Web",
            Profession::Fotografo => "Fotógrafo",
            Profession::Tradutor => "Tradutor",
            Profession::Motorista => "Motorista",
            Profession::Eletricista => "Eletricista",
            Profession::Encanador => "Encanador",
            Profession::PersonalTrainer => "Personal Trainer",
            Profession::ProfessorParticular => "Professor Particular",
            Profession::InstrutorDeYoga => "Instrutor de Yoga",
            Profession::Maquiador => "Maquiador",
            Profession::Cabeleireiro => "Cabeleireiro",
            Profession::Outros => "Outros",
        }
    }

    /// Exact match against the fixed list.
    pub fn from_label(label: &str) -> Option<Profession> {
        Self::ALL.into_iter().find(|p| p.label() == label.trim())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLinks {
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub instagram: Option<String>,
    #[serde(default)]
    pub facebook: Option<String>,
}

impl SocialLinks {
    fn check(&self, violations: &mut Violations) {
        violations.check_url(self.linkedin.as_deref(), "LinkedIn");
        violations.check_url(self.instagram.as_deref(), "Instagram");
        violations.check_url(self.facebook.as_deref(), "Facebook");
    }

    fn normalized(&self) -> SocialLinks {
        SocialLinks {
            linkedin: optional_text(self.linkedin.as_deref()),
            instagram: optional_text(self.instagram.as_deref()),
            facebook: optional_text(self.facebook.as_deref()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct FreelancerProfile {
    pub id: Uuid,
    pub account_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub profession: Profession,
    pub resume: String,
    pub resume_file: Option<String>,
    pub phone: Option<String>,
    pub availability: String,
    pub social_links: Json<SocialLinks>,
    pub profile_picture: String,
    pub average_rating: f64,
}

/// Profile fields shared by signup and edit, already trimmed and parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct FreelancerDetails {
    pub full_name: String,
    pub profession: Profession,
    pub resume: String,
    pub phone: Option<String>,
    pub availability: String,
    pub social_links: SocialLinks,
}

fn parse_profession(raw: &str, violations: &mut Violations) -> Option<Profession> {
    if raw.trim().is_empty() {
        violations.push("Profession is required.");
        return None;
    }
    let profession = Profession::from_label(raw);
    if profession.is_none() {
        violations.push("Profession is not in the list of available professions.");
    }
    profession
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreelancerSignup {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub profession: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub availability: String,
    #[serde(default)]
    pub resume: String,
    #[serde(default)]
    pub social_links: SocialLinks,
}

#[derive(Debug, Clone)]
pub struct NewFreelancer {
    pub email: String,
    pub password: String,
    pub details: FreelancerDetails,
}

impl FreelancerSignup {
    pub fn validate(&self) -> Result<NewFreelancer, AppError> {
        let mut violations = Violations::new();
        violations.check_email(&self.email);
        violations.check_new_account_password(&self.password, &self.confirm_password);
        violations.require(&self.full_name, "Full name is required.");
        let profession = parse_profession(&self.profession, &mut violations);
        self.social_links.check(&mut violations);
        violations.into_result()?;

        let profession = profession.ok_or(AppError::InternalError)?;
        Ok(NewFreelancer {
            email: normalize_email(&self.email),
            password: self.password.clone(),
            details: FreelancerDetails {
                full_name: self.full_name.trim().to_string(),
                profession,
                resume: self.resume.trim().to_string(),
                phone: optional_text(self.phone.as_deref()),
                availability: self.availability.trim().to_string(),
                social_links: self.social_links.normalized(),
            },
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FreelancerUpdate {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub profession: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub availability: String,
    #[serde(default)]
    pub resume: String,
    #[serde(default)]
    pub social_links: SocialLinks,
    #[serde(flatten)]
    pub password: PasswordChange,
}

impl FreelancerUpdate {
    pub fn validate(&self) -> Result<FreelancerDetails, AppError> {
        let mut violations = Violations::new();
        violations.require(&self.full_name, "Full name is required.");
        let profession = parse_profession(&self.profession, &mut violations);
        violations.require(&self.availability, "Availability is required.");
        violations.require(&self.resume, "Resume/experience is required.");
        self.social_links.check(&mut violations);
        self.password.check(&mut violations);
        violations.into_result()?;

        let profession = profession.ok_or(AppError::InternalError)?;
        Ok(FreelancerDetails {
            full_name: self.full_name.trim().to_string(),
            profession,
            resume: self.resume.trim().to_string(),
            phone: optional_text(self.phone.as_deref()),
            availability: self.availability.trim().to_string(),
            social_links: self.social_links.normalized(),
        })
    }
}
