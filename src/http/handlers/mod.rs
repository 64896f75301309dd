pub mod auth;
pub mod company;
pub mod freelancer;
pub mod rating;
pub mod upload;

pub use auth::{login_handler, me_handler, signup_company_handler, signup_freelancer_handler};
pub use company::{get_company_handler, update_company_handler, upload_logo_handler};
pub use freelancer::{
    get_freelancer_handler, list_professions_handler, search_freelancers_handler,
    update_freelancer_handler, upload_profile_picture_handler, upload_resume_handler,
};
pub use rating::{rating_status_handler, submit_rating_handler};
