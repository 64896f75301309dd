pub mod aggregate;
pub mod get;
pub mod post;

pub use aggregate::{recompute_average, refresh_average};
pub use get::{get_received_ratings, has_rated, rating_status};
pub use post::submit_rating;
