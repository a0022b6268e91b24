pub mod user_repo;
pub use user_repo::UserRepository;
pub mod property_repo;
pub use property_repo::PropertyRepository;
pub mod lead_repo;
pub use lead_repo::LeadRepository;
pub mod favorite_repo;
pub use favorite_repo::FavoriteRepository;
