pub mod get;
pub mod patch;
pub mod search;

pub use get::{get_freelancer, get_freelancer_by_account};
pub use patch::{set_profile_picture, set_resume_file, update_freelancer};
pub use search::search_freelancers;

pub(crate) const FREELANCER_SELECT: &str = "SELECT f.id, f.account_id, a.email, f.full_name,
        f.profession, f.resume, f.resume_file, f.phone, f.availability, f.social_links,
        f.profile_picture, f.average_rating
    FROM freelancers f
    JOIN accounts a ON a.id = f.account_id";
