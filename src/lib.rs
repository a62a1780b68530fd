pub mod config;
pub mod search;
pub mod sparql;
pub mod utils;
