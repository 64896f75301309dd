pub mod get;
pub mod patch;

pub use get::{get_company, get_company_by_account};
pub use patch::{set_logo, update_company};

pub(crate) const COMPANY_SELECT: &str = "SELECT c.id, c.account_id, a.email, c.name, c.industry,
        c.tax_id, c.address, c.contact, c.logo, c.average_rating
    FROM companies c
    JOIN accounts a ON a.id = c.account_id";
