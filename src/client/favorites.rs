// src/client/favorites.rs
//
// Toggle otimista do favorito: o coração muda na hora e volta se a
// requisição falhar.

use uuid::Uuid;

use crate::client::{
    api::{ClientError, FavoritesApi},
    store::AppStore,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteState {
    /// Estado confirmado pelo servidor
    Committed(bool),
    /// Requisição em andamento; a tela já mostra `requested`
    Pending { previous: bool, requested: bool },
    /// A requisição falhou e o valor anterior voltou
    Reverted(bool),
}

#[derive(Debug, Clone)]
pub struct FavoriteToggle {
    property_id: Uuid,
    state: FavoriteState,
}

impl FavoriteToggle {
    pub fn new(property_id: Uuid, is_favorite: bool) -> Self {
        Self {
            property_id,
            state: FavoriteState::Committed(is_favorite),
        }
    }

    pub fn property_id(&self) -> Uuid {
        self.property_id
    }

    pub fn state(&self) -> FavoriteState {
        self.state
    }

    /// O que a tela mostra agora
    pub fn is_favorite(&self) -> bool {
        match self.state {
            FavoriteState::Committed(v) | FavoriteState::Reverted(v) => v,
            FavoriteState::Pending { requested, .. } => requested,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, FavoriteState::Pending { .. })
    }

    /// Aplica a mudança otimista. Com uma requisição pendente não faz nada.
    pub fn begin(&mut self) -> Option<bool> {
        if self.is_pending() {
            return None;
        }
        let previous = self.is_favorite();
        self.state = FavoriteState::Pending {
            previous,
            requested: !previous,
        };
        Some(!previous)
    }

    /// O servidor manda o estado final
    pub fn commit(&mut self, server_value: bool) {
        self.state = FavoriteState::Committed(server_value);
    }

    pub fn revert(&mut self) {
        if let FavoriteState::Pending { previous, .. } = self.state {
            self.state = FavoriteState::Reverted(previous);
        }
    }

    /// Fluxo completo: otimista → chamada → commit ou revert com toast de erro.
    pub async fn toggle<A>(&mut self, api: &A, store: &mut AppStore) -> Result<bool, ClientError>
    where
        A: FavoritesApi + ?Sized,
    {
        let Some(_) = self.begin() else {
            return Ok(self.is_favorite());
        };

        match api.toggle_favorite(self.property_id).await {
            Ok(result) => {
                self.commit(result.is_favorite);
                Ok(result.is_favorite)
            }
            Err(e) => {
                tracing::warn!(property_id = %self.property_id, "Favorite toggle failed: {}", e);
                self.revert();
                store.error(e.to_string());
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use reqwest::StatusCode;

    use super::*;
    use crate::models::portal::FavoriteToggleResult;

    struct FakeFavorites {
        fail: bool,
    }

    #[async_trait]
    impl FavoritesApi for FakeFavorites {
        async fn toggle_favorite(&self, property_id: Uuid) -> Result<FavoriteToggleResult, ClientError> {
            if self.fail {
                return Err(ClientError::Api {
                    status: StatusCode::UNAUTHORIZED,
                    message: "Invalid token".into(),
                    details: None,
                });
            }
            Ok(FavoriteToggleResult {
                property_id,
                is_favorite: true,
            })
        }
    }

    #[test]
    fn begin_flips_immediately_and_blocks_double_clicks() {
        let mut fav = FavoriteToggle::new(Uuid::new_v4(), false);
        assert_eq!(fav.begin(), Some(true));
        assert!(fav.is_favorite());
        assert!(fav.is_pending());
        assert_eq!(fav.begin(), None);

        fav.revert();
        assert_eq!(fav.state(), FavoriteState::Reverted(false));
        assert!(!fav.is_favorite());
    }

    #[tokio::test]
    async fn success_commits_server_value() {
        let mut fav = FavoriteToggle::new(Uuid::new_v4(), false);
        let mut store = AppStore::new();

        let value = fav.toggle(&FakeFavorites { fail: false }, &mut store).await.unwrap();

        assert!(value);
        assert_eq!(fav.state(), FavoriteState::Committed(true));
        assert!(store.toasts().is_empty());
    }

    #[tokio::test]
    async fn failure_reverts_and_shows_toast() {
        let mut fav = FavoriteToggle::new(Uuid::new_v4(), false);
        let mut store = AppStore::new();

        let err = fav.toggle(&FakeFavorites { fail: true }, &mut store).await.unwrap_err();

        assert!(err.is_unauthorized());
        assert_eq!(fav.state(), FavoriteState::Reverted(false));
        assert_eq!(store.toasts().len(), 1);
    }
}
