// src/client.rs
//
// Lado cliente do dashboard e do portal: máquinas de estado puras que
// falam com a API REST pelos traits de `api`.

pub mod api;
pub mod bulk;
pub mod csv;
pub mod favorites;
pub mod feed;
pub mod grid;
pub mod selection;
pub mod store;

pub use api::{ApiClient, ClientError, FavoritesApi, LeadsApi, ListingSource};
