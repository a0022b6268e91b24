//! Repository tests against a real Postgres.
//!
//! Run with `DATABASE_URL=postgres://... cargo test -- --ignored`.
//! `#[sqlx::test]` creates a fresh database per test and applies `migrations/`.

use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use realty_crm::{
    db::{FavoriteRepository, LeadRepository, PropertyRepository},
    models::{
        lead::{LeadInput, LeadPatch, LeadSource, LeadStatus},
        portal::FavoriteInsert,
        property::{PropertyFilters, PropertyInput, PropertySort, PropertyStatus, PropertyType},
    },
    services::lead_service::summarize_leads,
};

async fn company(pool: &PgPool, name: &str) -> Uuid {
    sqlx::query_scalar("INSERT INTO companies (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn buyer(pool: &PgPool) -> Uuid {
    sqlx::query_scalar("INSERT INTO profiles (email, password_hash) VALUES ($1, 'x') RETURNING id")
        .bind(format!("{}@buyers.test", Uuid::new_v4()))
        .fetch_one(pool)
        .await
        .unwrap()
}

fn property(title: &str, price: i64, property_type: PropertyType, published: bool) -> PropertyInput {
    PropertyInput {
        title: title.to_string(),
        price: Decimal::new(price, 0),
        location: "Dubai Marina".to_string(),
        bedrooms: 2,
        bathrooms: 2,
        area: Decimal::new(1200, 0),
        property_type,
        status: PropertyStatus::Ready,
        images: vec![],
        amenities: vec![],
        is_published: published,
        description: None,
        handover_date: None,
        payment_plan: None,
        rera_id: None,
        roi_estimate: None,
    }
}

fn lead(name: &str, status: LeadStatus, property_id: Option<Uuid>) -> LeadInput {
    LeadInput {
        property_id,
        name: name.to_string(),
        phone: None,
        email: None,
        message: None,
        status,
        source: LeadSource::Website,
        follow_up_date: None,
        notes: None,
    }
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn published_listing_applies_filters_and_paging(pool: PgPool) {
    let repo = PropertyRepository::new(pool.clone());
    let tenant = company(&pool, "Acme Realty").await;

    repo.create(&pool, tenant, &property("Cheap Flat", 400_000, PropertyType::Apartment, true)).await.unwrap();
    repo.create(&pool, tenant, &property("Marina Flat", 900_000, PropertyType::Apartment, true)).await.unwrap();
    repo.create(&pool, tenant, &property("Palm Villa", 5_000_000, PropertyType::Villa, true)).await.unwrap();
    repo.create(&pool, tenant, &property("Draft Flat", 800_000, PropertyType::Apartment, false)).await.unwrap();

    let filters = PropertyFilters {
        price_min: Some(Decimal::new(500_000, 0)),
        property_types: vec![PropertyType::Apartment],
        ..Default::default()
    };
    let page = repo.get_published_properties(&filters, 12).await.unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.data[0].title, "Marina Flat");

    let sorted = PropertyFilters {
        sort: Some(PropertySort::PriceDesc),
        limit: Some(2),
        ..Default::default()
    };
    let first = repo.get_published_properties(&sorted, 12).await.unwrap();
    assert_eq!(first.total, 3);
    assert_eq!(first.total_pages, 2);
    assert_eq!(first.data[0].title, "Palm Villa");

    let search = PropertyFilters {
        search: Some("palm".into()),
        ..Default::default()
    };
    assert_eq!(repo.get_published_properties(&search, 12).await.unwrap().total, 1);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn favorites_insert_is_idempotent(pool: PgPool) {
    let properties = PropertyRepository::new(pool.clone());
    let favorites = FavoriteRepository::new(pool.clone());
    let tenant = company(&pool, "Acme Realty").await;
    let buyer = buyer(&pool).await;
    let listing = properties
        .create(&pool, tenant, &property("Marina Flat", 900_000, PropertyType::Apartment, true))
        .await
        .unwrap();

    assert_eq!(favorites.insert(buyer, listing.id).await.unwrap(), FavoriteInsert::Created);
    assert_eq!(favorites.insert(buyer, listing.id).await.unwrap(), FavoriteInsert::AlreadyExists);
    assert_eq!(favorites.list_property_ids(buyer).await.unwrap(), vec![listing.id]);

    assert!(favorites.remove(buyer, listing.id).await.unwrap());
    assert!(!favorites.remove(buyer, listing.id).await.unwrap());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn bulk_actions_stay_inside_the_tenant(pool: PgPool) {
    let leads = LeadRepository::new(pool.clone());
    let acme = company(&pool, "Acme Realty").await;
    let other = company(&pool, "Other Realty").await;

    let mine = leads.create(&pool, acme, &lead("Omar", LeadStatus::New, None)).await.unwrap();
    let theirs = leads.create(&pool, other, &lead("Sara", LeadStatus::New, None)).await.unwrap();

    let affected = leads
        .bulk_update(&pool, acme, &[mine.id, theirs.id], &LeadPatch::status(LeadStatus::Won))
        .await
        .unwrap();
    assert_eq!(affected, 1);

    let untouched = leads.find_by_id(&pool, other, theirs.id).await.unwrap().unwrap();
    assert_eq!(untouched.status, LeadStatus::New);

    assert_eq!(leads.bulk_delete(&pool, acme, &[mine.id, theirs.id]).await.unwrap(), 1);
    assert!(leads.find_by_id(&pool, acme, mine.id).await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn analytics_rows_feed_the_summary(pool: PgPool) {
    let properties = PropertyRepository::new(pool.clone());
    let leads = LeadRepository::new(pool.clone());
    let tenant = company(&pool, "Acme Realty").await;
    let listing = properties
        .create(&pool, tenant, &property("Marina Flat", 900_000, PropertyType::Apartment, true))
        .await
        .unwrap();

    for (name, status) in [("A", LeadStatus::Won), ("B", LeadStatus::Won), ("C", LeadStatus::Lost)] {
        leads.create(&pool, tenant, &lead(name, status, Some(listing.id))).await.unwrap();
    }

    let rows = leads.fetch_analytics_rows(&pool, tenant).await.unwrap();
    let summary = summarize_leads(&rows);

    assert_eq!(summary.total, 3);
    assert_eq!(summary.conversion_rate, 67);
    assert_eq!(summary.by_status.get(&LeadStatus::Won), Some(&2));
    assert_eq!(summary.top_properties[0].title.as_deref(), Some("Marina Flat"));
    assert_eq!(summary.top_properties[0].lead_count, 3);
}
