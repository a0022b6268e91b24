pub mod auth;
pub mod lead_service;
pub mod notifier;
pub mod portal_service;
pub mod property_service;
pub mod user_service;
