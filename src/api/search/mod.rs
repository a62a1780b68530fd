pub mod query;
pub mod types;

pub use query::{city_search, country_search};
