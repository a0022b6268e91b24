// src/client/feed.rs
//
// Scroll infinito do portal. A página 1 vem do servidor; as seguintes são
// buscadas quando o sentinela entra na tela.

use crate::{
    client::api::{ClientError, ListingSource},
    models::property::{Paginated, PortalProperty, PropertyFilters},
};

#[derive(Debug, Clone)]
pub struct ListingFeed {
    criteria: PropertyFilters,
    items: Vec<PortalProperty>,
    page: i64,
    total: i64,
    total_pages: i64,
    has_more: bool,
}

// A página não faz parte dos critérios
fn normalize(mut criteria: PropertyFilters) -> PropertyFilters {
    criteria.page = None;
    criteria
}

impl ListingFeed {
    pub fn new(criteria: PropertyFilters, first_page: Paginated<PortalProperty>) -> Self {
        let page = first_page.page.max(1);
        let has_more = !first_page.data.is_empty() && page < first_page.total_pages;

        Self {
            criteria: normalize(criteria),
            items: first_page.data,
            page,
            total: first_page.total,
            total_pages: first_page.total_pages,
            has_more,
        }
    }

    /// Critérios mudaram: descarta tudo e recomeça da página do servidor.
    pub fn reset(&mut self, criteria: PropertyFilters, first_page: Paginated<PortalProperty>) {
        *self = Self::new(criteria, first_page);
    }

    /// Reseta só se os critérios forem diferentes. Devolve se resetou.
    pub fn sync(&mut self, criteria: PropertyFilters, first_page: Paginated<PortalProperty>) -> bool {
        if normalize(criteria.clone()) == self.criteria {
            return false;
        }
        self.reset(criteria, first_page);
        true
    }

    /// Busca a próxima página e acrescenta ao fim. Erro não altera o estado.
    /// Devolve quantos itens entraram.
    pub async fn load_more<S>(&mut self, source: &S) -> Result<usize, ClientError>
    where
        S: ListingSource + ?Sized,
    {
        if !self.has_more {
            return Ok(0);
        }

        let next = self.page + 1;
        if next > self.total_pages {
            self.has_more = false;
            return Ok(0);
        }

        let page = source.fetch_page(&self.criteria, next).await?;

        // Página vazia encerra, mesmo que o total diga o contrário
        if page.data.is_empty() {
            self.has_more = false;
            return Ok(0);
        }

        let added = page.data.len();
        self.items.extend(page.data);
        self.page = next;
        self.total = page.total;
        self.total_pages = page.total_pages;
        self.has_more = next < page.total_pages;

        tracing::debug!(page = next, added, "Portal feed page appended");
        Ok(added)
    }

    pub fn items(&self) -> &[PortalProperty] {
        &self.items
    }

    pub fn criteria(&self) -> &PropertyFilters {
        &self.criteria
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn total(&self) -> i64 {
        self.total
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Atualiza o coração de um card depois do toggle
    pub fn set_favorite(&mut self, property_id: uuid::Uuid, is_favorite: bool) {
        for item in self.items.iter_mut().filter(|i| i.property.id == property_id) {
            item.is_favorite = is_favorite;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use reqwest::StatusCode;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use super::*;
    use crate::models::property::{Property, PropertyStatus, PropertyType};

    fn listing(title: &str) -> PortalProperty {
        PortalProperty {
            property: Property {
                id: Uuid::new_v4(),
                tenant_id: Uuid::new_v4(),
                title: title.to_string(),
                price: Decimal::new(1_200_000, 0),
                location: "Dubai Marina".into(),
                bedrooms: 2,
                bathrooms: 2,
                area: Decimal::new(1100, 0),
                property_type: PropertyType::Apartment,
                status: PropertyStatus::Ready,
                images: vec![],
                amenities: vec![],
                is_published: true,
                description: None,
                handover_date: None,
                payment_plan: None,
                rera_id: None,
                roi_estimate: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            is_favorite: false,
        }
    }

    fn page_of(n: usize, page: i64, total: i64, total_pages: i64) -> Paginated<PortalProperty> {
        Paginated {
            data: (0..n).map(|i| listing(&format!("Listing {page}-{i}"))).collect(),
            total,
            page,
            limit: 2,
            total_pages,
        }
    }

    // Fonte em memória: devolve as páginas na ordem e registra os pedidos
    struct FakeSource {
        pages: Mutex<Vec<Result<Paginated<PortalProperty>, ClientError>>>,
        requested: Mutex<Vec<i64>>,
    }

    impl FakeSource {
        fn new(pages: Vec<Result<Paginated<PortalProperty>, ClientError>>) -> Self {
            Self {
                pages: Mutex::new(pages),
                requested: Mutex::new(vec![]),
            }
        }
    }

    #[async_trait]
    impl ListingSource for FakeSource {
        async fn fetch_page(&self, _criteria: &PropertyFilters, page: i64) -> Result<Paginated<PortalProperty>, ClientError> {
            self.requested.lock().unwrap().push(page);
            let mut pages = self.pages.lock().unwrap();
            if pages.is_empty() {
                return Ok(page_of(0, page, 0, 0));
            }
            pages.remove(0)
        }
    }

    #[tokio::test]
    async fn appends_pages_until_the_last_one() {
        let mut feed = ListingFeed::new(PropertyFilters::default(), page_of(2, 1, 5, 3));
        let source = FakeSource::new(vec![Ok(page_of(2, 2, 5, 3)), Ok(page_of(1, 3, 5, 3))]);

        assert_eq!(feed.load_more(&source).await.unwrap(), 2);
        assert_eq!(feed.load_more(&source).await.unwrap(), 1);
        assert!(!feed.has_more());
        assert_eq!(feed.items().len(), 5);

        // Sem mais páginas, nenhum pedido novo
        assert_eq!(feed.load_more(&source).await.unwrap(), 0);
        assert_eq!(*source.requested.lock().unwrap(), vec![2, 3]);
    }

    #[tokio::test]
    async fn empty_page_stops_even_when_more_were_expected() {
        let mut feed = ListingFeed::new(PropertyFilters::default(), page_of(2, 1, 10, 5));
        assert!(feed.has_more());

        let source = FakeSource::new(vec![Ok(page_of(0, 2, 10, 5))]);
        assert_eq!(feed.load_more(&source).await.unwrap(), 0);
        assert!(!feed.has_more());
        assert_eq!(feed.page(), 1);

        feed.load_more(&source).await.unwrap();
        assert_eq!(source.requested.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn error_leaves_state_untouched() {
        let mut feed = ListingFeed::new(PropertyFilters::default(), page_of(2, 1, 4, 2));
        let source = FakeSource::new(vec![Err(ClientError::Api {
            status: StatusCode::BAD_GATEWAY,
            message: "Bad Gateway".into(),
            details: None,
        })]);

        assert!(feed.load_more(&source).await.is_err());
        assert_eq!(feed.items().len(), 2);
        assert_eq!(feed.page(), 1);
        assert!(feed.has_more());
    }

    #[test]
    fn single_page_has_nothing_more() {
        let feed = ListingFeed::new(PropertyFilters::default(), page_of(2, 1, 2, 1));
        assert!(!feed.has_more());
    }

    #[test]
    fn sync_resets_only_when_criteria_change() {
        let mut feed = ListingFeed::new(PropertyFilters::default(), page_of(2, 1, 4, 2));

        let same = PropertyFilters {
            page: Some(1),
            ..Default::default()
        };
        assert!(!feed.sync(same, page_of(1, 1, 1, 1)));
        assert_eq!(feed.items().len(), 2);

        let villas = PropertyFilters {
            property_types: vec![PropertyType::Villa],
            ..Default::default()
        };
        assert!(feed.sync(villas.clone(), page_of(1, 1, 1, 1)));
        assert_eq!(feed.items().len(), 1);
        assert_eq!(feed.criteria(), &villas);
        assert!(!feed.has_more());
    }

    #[test]
    fn set_favorite_marks_matching_card() {
        let mut feed = ListingFeed::new(PropertyFilters::default(), page_of(2, 1, 2, 1));
        let id = feed.items()[1].property.id;

        feed.set_favorite(id, true);
        assert!(feed.items()[1].is_favorite);
        assert!(!feed.items()[0].is_favorite);
    }
}
