//! Integration tests for the Events domain
//!
//! These tests use real PostgreSQL via testcontainers to ensure:
//! - The migration's schema matches the entity
//! - Location filter and search queries behave like the in-memory store
//! - The guarded join never pushes attendees past capacity

use domain_events::*;
use std::sync::Arc;
use test_utils::{
    TestDataBuilder, TestDatabase,
    assertions::{assert_ascending, assert_some},
};

fn create_input(builder: &TestDataBuilder, suffix: &str, category: &str) -> CreateEvent {
    CreateEvent {
        title: builder.name("event", suffix),
        category: category.to_string(),
        description: Some("Integration test event".to_string()),
        date: "2025-10-04".to_string(),
        location: "Community centre".to_string(),
        city: Some(builder.city()),
        zipcode: Some(builder.zipcode()),
        area: Some("Old Town".to_string()),
        icon: Some("🎉".to_string()),
        attendees: 0,
        max_attendees: DEFAULT_MAX_ATTENDEES,
    }
}

// ============================================================================
// Repository Tests
// ============================================================================

#[tokio::test]
async fn test_create_and_get_event() {
    let db = TestDatabase::new().await;
    let repo = PgEventRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("create_and_get");

    let input = create_input(&builder, "main", "music");
    let created = repo.create(input.clone()).await.unwrap();

    assert!(created.id > 0);
    assert_eq!(created.title, input.title);
    assert_eq!(created.city, input.city);
    assert_eq!(created.max_attendees, DEFAULT_MAX_ATTENDEES);

    let retrieved = repo.get_by_id(created.id).await.unwrap();
    let retrieved = assert_some(retrieved, "event should exist");
    assert_eq!(retrieved, created);
}

#[tokio::test]
async fn test_list_is_ordered_by_id() {
    let db = TestDatabase::new().await;
    let repo = PgEventRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("list_order");

    for suffix in ["a", "b", "c"] {
        repo.create(create_input(&builder, suffix, "misc"))
            .await
            .unwrap();
    }

    let ids: Vec<i64> = repo.list().await.unwrap().iter().map(|e| e.id).collect();
    assert_eq!(ids.len(), 3);
    assert_ascending(&ids, "event ids");
}

#[tokio::test]
async fn test_update_writes_only_editable_fields() {
    let db = TestDatabase::new().await;
    let repo = PgEventRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("update_fields");

    let created = repo
        .create(create_input(&builder, "main", "sport"))
        .await
        .unwrap();

    let updated = repo
        .update(
            created.id,
            UpdateEvent {
                title: "Renamed".to_string(),
                category: "outdoor".to_string(),
                description: None,
                date: "2025-10-05".to_string(),
                location: "Stadium".to_string(),
                attendees: 3,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.category, "outdoor");
    assert_eq!(updated.description, None);
    assert_eq!(updated.attendees, 3);
    assert_eq!(updated.city, created.city);
    assert_eq!(updated.zipcode, created.zipcode);
    assert_eq!(updated.area, created.area);
    assert_eq!(updated.icon, created.icon);
    assert_eq!(updated.max_attendees, created.max_attendees);
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn test_update_missing_event() {
    let db = TestDatabase::new().await;
    let repo = PgEventRepository::new(db.connection());

    let result = repo
        .update(
            404,
            UpdateEvent {
                title: "x".to_string(),
                category: "y".to_string(),
                description: None,
                date: "z".to_string(),
                location: "w".to_string(),
                attendees: 0,
            },
        )
        .await;

    assert!(
        matches!(result, Err(EventError::NotFound(404))),
        "Expected NotFound, got {:?}",
        result
    );
}

#[tokio::test]
async fn test_delete_reports_whether_row_existed() {
    let db = TestDatabase::new().await;
    let repo = PgEventRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("delete");

    let created = repo
        .create(create_input(&builder, "main", "misc"))
        .await
        .unwrap();

    assert!(repo.delete(created.id).await.unwrap());
    assert!(!repo.delete(created.id).await.unwrap());
    assert!(repo.get_by_id(created.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_find_by_location_is_exact() {
    let db = TestDatabase::new().await;
    let repo = PgEventRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("find_by_location");

    let matching = repo
        .create(create_input(&builder, "match", "music"))
        .await
        .unwrap();

    let mut other = create_input(&builder, "other", "music");
    other.city = Some(format!("{}-Nord", builder.city()));
    repo.create(other).await.unwrap();

    let found = repo
        .find_by_location(&LocationQuery::City(builder.city()))
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, matching.id);

    let found = repo
        .find_by_location(&LocationQuery::CityZipcodeArea {
            city: builder.city(),
            zipcode: builder.zipcode(),
            area: "old town".to_string(),
        })
        .await
        .unwrap();
    assert!(found.is_empty(), "exact match must be case-sensitive");
}

#[tokio::test]
async fn test_search_is_case_insensitive_substring() {
    let db = TestDatabase::new().await;
    let repo = PgEventRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("search");

    repo.create(create_input(&builder, "music", "music"))
        .await
        .unwrap();
    repo.create(create_input(&builder, "games", "games"))
        .await
        .unwrap();

    let found = repo.search_by_location("old t").await.unwrap();
    assert_eq!(found.len(), 2);

    let found = repo
        .search_by_location_and_category(&builder.city().to_uppercase(), "music")
        .await
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].category, "music");

    // LIKE wildcards in the term are literal
    assert!(repo.search_by_location("%").await.unwrap().is_empty());
    assert!(repo.search_by_location("_ld").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_find_by_category() {
    let db = TestDatabase::new().await;
    let repo = PgEventRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("category");

    repo.create(create_input(&builder, "a", "music"))
        .await
        .unwrap();
    repo.create(create_input(&builder, "b", "Music"))
        .await
        .unwrap();

    let found = repo.find_by_category("music").await.unwrap();
    assert_eq!(found.len(), 1);
}

// ============================================================================
// Capacity Tests
// ============================================================================

#[tokio::test]
async fn test_try_join_stops_at_capacity() {
    let db = TestDatabase::new().await;
    let repo = PgEventRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("try_join");

    let mut input = create_input(&builder, "small", "social");
    input.max_attendees = 2;
    let event = repo.create(input).await.unwrap();

    assert_eq!(repo.try_join(event.id).await.unwrap().unwrap().attendees, 1);
    assert_eq!(repo.try_join(event.id).await.unwrap().unwrap().attendees, 2);
    assert!(repo.try_join(event.id).await.unwrap().is_none());

    let stored = repo.get_by_id(event.id).await.unwrap().unwrap();
    assert_eq!(stored.attendees, 2);

    assert!(repo.try_join(event.id + 1000).await.unwrap().is_none());
}

#[tokio::test]
async fn test_concurrent_joins_never_exceed_capacity() {
    let db = TestDatabase::new().await;
    let service = Arc::new(EventService::new(PgEventRepository::new(db.connection())));
    let builder = TestDataBuilder::from_test_name("concurrent_join");

    let mut input = create_input(&builder, "popular", "social");
    input.max_attendees = 5;
    let event = service.create_event(input).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..20 {
        let service = Arc::clone(&service);
        handles.push(tokio::spawn(
            async move { service.join_event(event.id).await },
        ));
    }

    let mut joined = 0;
    let mut full = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => joined += 1,
            Err(EventError::Full(_)) => full += 1,
            Err(e) => panic!("unexpected error: {e:?}"),
        }
    }

    assert_eq!(joined, 5);
    assert_eq!(full, 15);

    let stored = service.get_event(event.id).await.unwrap();
    assert_eq!(stored.attendees, 5);
}

#[tokio::test]
async fn test_check_constraint_rejects_overfull_row() {
    let db = TestDatabase::new().await;
    let repo = PgEventRepository::new(db.connection());
    let builder = TestDataBuilder::from_test_name("check_constraint");

    let mut input = create_input(&builder, "bad", "misc");
    input.attendees = 3;
    input.max_attendees = 2;

    let result = repo.create(input).await;
    assert!(
        matches!(result, Err(EventError::Internal(_))),
        "Expected the CHECK constraint to fail the insert, got {:?}",
        result
    );
}
