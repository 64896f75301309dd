pub mod get;
pub mod patch;
pub mod post;

pub use get::{authenticate, find_account_by_email, profile_id_for_account};
pub use post::{signup_company, signup_freelancer};
