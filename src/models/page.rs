use serde::Serialize;

use crate::models::{CompanyProfile, FreelancerProfile, ReceivedRating, Role};

/// A public profile with the ratings it received.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePage<T> {
    pub profile: T,
    pub ratings: Vec<ReceivedRating>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ProfileView {
    Freelancer(FreelancerProfile),
    Company(CompanyProfile),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub role: Role,
    pub profile: ProfileView,
    pub ratings: Vec<ReceivedRating>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub file_name: String,
    pub url: String,
}
