pub mod db;

pub mod accounts;
pub mod cards;
pub mod investments;
pub mod ledger;
pub mod pix;
pub mod users;

pub mod constants;
pub mod errors;
pub mod schema;
pub mod utils;

pub use errors::{Error, Result};
