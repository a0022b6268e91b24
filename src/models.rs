pub mod auth;
pub mod lead;
pub mod portal;
pub mod property;
pub mod user;
