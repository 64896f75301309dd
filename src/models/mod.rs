pub mod account;
pub mod company;
pub mod freelancer;
pub mod page;
pub mod rating;
pub mod search;

pub use account::{Account, AuthContext, Claims, Role};
pub use company::CompanyProfile;
pub use freelancer::{FreelancerProfile, Profession};
pub use rating::{RatingEvent, ReceivedRating};
