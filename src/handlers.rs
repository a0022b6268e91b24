pub mod auth;
pub mod leads;
pub mod portal;
pub mod properties;
pub mod users;
